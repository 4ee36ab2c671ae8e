//! Wire-level node and edge records.
//!
//! Records mirror what editors and servers actually exchange: optional
//! fields, alternate spellings (`source`/`target`, `createdAt`), numbers
//! typed as text. They are normalized exactly once by
//! [`GraphBuilder`](crate::GraphBuilder); nothing downstream reads them
//! directly except to write branch ids back.

use std::collections::BTreeMap;

use pn_core::{LenientNumber, Point};
use serde::{Deserialize, Deserializer, Serialize};

/// Fields this crate does not interpret, kept verbatim for round-trips.
pub type Extra = BTreeMap<String, serde_json::Value>;

/// A node as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub branch_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_ui: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_ui: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lat: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lon: Option<LenientNumber>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    /// Builder-style planar coordinates.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    /// First usable coordinate pair: planar, then UI, then GPS (lon, lat).
    pub fn position(&self) -> Option<Point> {
        let candidates = [
            (&self.x, &self.y),
            (&self.x_ui, &self.y_ui),
            (&self.gps_lon, &self.gps_lat),
        ];
        candidates.into_iter().find_map(|(x, y)| {
            let x = x.as_ref()?.value()?;
            let y = y.as_ref()?.value()?;
            Some(Point::new(x, y))
        })
    }
}

/// An edge (pipe segment) as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mm: Option<LenientNumber>,
    #[serde(
        default,
        alias = "fallback_diameter",
        skip_serializing_if = "Option::is_none"
    )]
    pub ui_diameter_mm: Option<LenientNumber>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<GeoPoint>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub branch_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl EdgeRecord {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            from_id: Some(from.into()),
            to_id: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn with_diameter(mut self, diameter_mm: f64) -> Self {
        self.diameter_mm = Some(diameter_mm.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_geometry(mut self, points: &[(f64, f64)]) -> Self {
        self.geometry = Some(
            points
                .iter()
                .map(|&(x, y)| GeoPoint::Pair(vec![x.into(), y.into()]))
                .collect(),
        );
        self
    }

    /// Upstream endpoint: `from_id`, else `source`.
    pub fn from_endpoint(&self) -> Option<&str> {
        non_blank(self.from_id.as_deref()).or_else(|| non_blank(self.source.as_deref()))
    }

    /// Downstream endpoint: `to_id`, else `target`.
    pub fn to_endpoint(&self) -> Option<&str> {
        non_blank(self.to_id.as_deref()).or_else(|| non_blank(self.target.as_deref()))
    }

    /// Parsed geometry; `None` unless at least two points are readable.
    pub fn geometry_points(&self) -> Option<Vec<Point>> {
        let points: Vec<Point> = self
            .geometry
            .as_ref()?
            .iter()
            .filter_map(GeoPoint::point)
            .collect();
        (points.len() >= 2).then_some(points)
    }
}

/// One vertex of an edge polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoPoint {
    /// `[x, y]` or `[lon, lat]`, extra ordinates ignored.
    Pair(Vec<LenientNumber>),
    Object(GeoObject),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<LenientNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<LenientNumber>,
}

impl GeoPoint {
    pub fn point(&self) -> Option<Point> {
        match self {
            GeoPoint::Pair(values) => {
                let x = values.first()?.value()?;
                let y = values.get(1)?.value()?;
                Some(Point::new(x, y))
            }
            GeoPoint::Object(obj) => {
                let x = [&obj.x, &obj.lon, &obj.lng, &obj.longitude]
                    .into_iter()
                    .find_map(|v| v.as_ref())?
                    .value()?;
                let y = [&obj.y, &obj.lat, &obj.latitude]
                    .into_iter()
                    .find_map(|v| v.as_ref())?
                    .value()?;
                Some(Point::new(x, y))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_endpoint_aliases() {
        let edge: EdgeRecord =
            serde_json::from_str(r#"{"id":"E1","source":"A","target":"B"}"#).unwrap();
        assert_eq!(edge.from_endpoint(), Some("A"));
        assert_eq!(edge.to_endpoint(), Some("B"));

        let edge: EdgeRecord =
            serde_json::from_str(r#"{"id":"E1","from_id":" ","source":"A","to_id":"C","target":"B"}"#)
                .unwrap();
        assert_eq!(edge.from_endpoint(), Some("A"));
        assert_eq!(edge.to_endpoint(), Some("C"));
    }

    #[test]
    fn edge_field_aliases_and_nulls() {
        let edge: EdgeRecord = serde_json::from_str(
            r#"{"id":"E1","fallback_diameter":"90","createdAt":"2024-01-01","branch_id":null}"#,
        )
        .unwrap();
        assert_eq!(edge.ui_diameter_mm.and_then(|d| d.value()), Some(90.0));
        assert_eq!(edge.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(edge.branch_id, "");
    }

    #[test]
    fn unknown_fields_survive() {
        let text = r#"{"id":"N1","type":"VANNE","branch_id":"B","name":"Vanne 1","depth_m":1.2}"#;
        let node: NodeRecord = serde_json::from_str(text).unwrap();
        assert_eq!(node.extra.get("name"), Some(&serde_json::json!("Vanne 1")));
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["depth_m"], serde_json::json!(1.2));
        assert_eq!(back["type"], serde_json::json!("VANNE"));
    }

    #[test]
    fn node_position_order() {
        let node: NodeRecord =
            serde_json::from_str(r#"{"id":"N","x_ui":"10,5","y_ui":2,"gps_lon":3,"gps_lat":4}"#)
                .unwrap();
        assert_eq!(node.position(), Some(Point::new(10.5, 2.0)));

        let node: NodeRecord =
            serde_json::from_str(r#"{"id":"N","x":1,"gps_lon":3,"gps_lat":4}"#).unwrap();
        assert_eq!(node.position(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn geometry_shapes() {
        let edge: EdgeRecord = serde_json::from_str(
            r#"{"geometry":[[0,0,12],{"lon":1,"lat":"2"},{"x":"bad","y":1},[5]]}"#,
        )
        .unwrap();
        let points = edge.geometry_points().unwrap();
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0)]);

        let edge = EdgeRecord::default().with_geometry(&[(0.0, 0.0)]);
        assert!(edge.geometry_points().is_none());
    }
}
