//! Scenario tests for the session controller.
//!
//! Every test drives an [`EditorSession`](super::EditorSession) against
//! in-memory stores and a surface that records the commands it receives.


mod editing_tests;
mod vocabulary_tests;
