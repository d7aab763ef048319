//! Region data model: user-drawn shapes and their tags.
//!
//! Regions are stored in the asset's native resolution. Geometry reported by
//! the drawing surface arrives as [`RegionData`] and is scaled by the surface
//! before it becomes a [`Region`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Minimum number of points for a rectangle (its four corners).
pub const MIN_RECTANGLE_POINTS: usize = 4;

/// Minimum number of vertices required for a valid polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Stable identifier of a region within one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    /// Generate a fresh, never reused identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner X coordinate
    pub left: f32,
    /// Top-left corner Y coordinate
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// The shape type of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionType {
    Rectangle,
    Polygon,
}

impl RegionType {
    /// Minimum number of points a region of this type must have.
    pub fn min_points(&self) -> usize {
        match self {
            RegionType::Rectangle => MIN_RECTANGLE_POINTS,
            RegionType::Polygon => MIN_POLYGON_POINTS,
        }
    }
}

/// Raw geometry exchanged with the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionData {
    pub region_type: RegionType,
    pub points: Vec<Point>,
}

impl RegionData {
    pub fn new(region_type: RegionType, points: Vec<Point>) -> Self {
        Self {
            region_type,
            points,
        }
    }

    /// Four-corner rectangle from its top-left corner and size.
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            RegionType::Rectangle,
            vec![
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
        )
    }

    /// Check point count and coordinates for this shape type.
    pub fn validate(&self) -> Result<(), SessionError> {
        let required = self.region_type.min_points();
        if self.points.len() < required {
            return Err(SessionError::InvalidGeometry {
                region_type: self.region_type,
                points: self.points.len(),
                required,
            });
        }
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(SessionError::invalid_coordinates(format!(
                "non-finite point ({}, {})",
                p.x, p.y
            )));
        }
        Ok(())
    }

    /// Get the bounding box of the points.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.points.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BoundingBox {
            left: min_x,
            top: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

// ============================================================================
// Region
// ============================================================================

/// A user-drawn shape with its tags, anchored to one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    pub points: Vec<Point>,
    /// Tag names; unique within the region, order is not significant.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Region {
    /// Build a region from validated surface geometry.
    pub fn from_data(id: RegionId, data: RegionData) -> Result<Self, SessionError> {
        data.validate()?;
        Ok(Self {
            id,
            region_type: data.region_type,
            points: data.points,
            tags: Vec::new(),
        })
    }

    /// Validate the region's geometry.
    pub fn validate(&self) -> Result<(), SessionError> {
        self.data().validate()
    }

    /// The region's geometry.
    pub fn data(&self) -> RegionData {
        RegionData::new(self.region_type, self.points.clone())
    }

    /// Replace the geometry, leaving the id and tags untouched.
    pub fn set_geometry(&mut self, data: RegionData) -> Result<(), SessionError> {
        data.validate()?;
        self.region_type = data.region_type;
        self.points = data.points;
        Ok(())
    }

    /// Add a tag. Returns false if the region already carried it.
    pub fn add_tag(&mut self, name: &str) -> bool {
        if self.has_tag(name) {
            return false;
        }
        self.tags.push(name.to_string());
        true
    }

    /// Remove a tag. Returns false if the region did not carry it.
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        self.tags.len() != before
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Whether the region carries at least one tag.
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Drop repeated tag names, keeping the first occurrence.
    pub fn dedup_tags(&mut self) {
        let mut seen = HashSet::new();
        self.tags.retain(|t| seen.insert(t.clone()));
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.data().bounding_box()
    }
}

/// Structural equality that ignores tag order.
impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        if self.id != other.id
            || self.region_type != other.region_type
            || self.points != other.points
            || self.tags.len() != other.tags.len()
        {
            return false;
        }
        let ours: HashSet<&str> = self.tags.iter().map(String::as_str).collect();
        other.tags.iter().all(|t| ours.contains(t.as_str()))
    }
}
