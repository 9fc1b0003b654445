//! GoJS `GraphLinksModel` document

use serde::{Deserialize, Serialize};

pub const MODEL_CLASS: &str = "go.GraphLinksModel";
pub const FROM_PORT_PROPERTY: &str = "fromPort";
pub const TO_PORT_PROPERTY: &str = "toPort";

/// Top-level layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLinksModel {
    pub class: String,
    pub link_from_port_id_property: String,
    pub link_to_port_id_property: String,
    pub node_data_array: Vec<NodeRecord>,
    pub link_data_array: Vec<LinkRecord>,
}

impl GraphLinksModel {
    pub fn new(nodes: Vec<NodeRecord>, links: Vec<LinkRecord>) -> Self {
        Self {
            class: MODEL_CLASS.to_string(),
            link_from_port_id_property: FROM_PORT_PROPERTY.to_string(),
            link_to_port_id_property: TO_PORT_PROPERTY.to_string(),
            node_data_array: nodes,
            link_data_array: links,
        }
    }

    pub fn node(&self, key: &str) -> Option<&NodeRecord> {
        self.node_data_array.iter().find(|n| n.key == key)
    }
}

impl Default for GraphLinksModel {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// One entry of `nodeDataArray`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub key: String,
    pub category: String,
    /// Centre position, `"x y"`
    pub pos: String,
    /// Unrotated size, `"w h"`
    pub size: String,
    pub text: String,
    pub angle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<PortRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_text: Option<Vec<ShapeTextRecord>>,
}

/// A connection port as declared by the shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    pub port_id: String,
    pub x: String,
    pub y: String,
}

/// Text drawn inside a node's shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTextRecord {
    pub text: String,
    pub x: String,
    pub y: String,
    pub font: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    pub angle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valign: Option<String>,
}

/// One entry of `linkDataArray`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub label: String,
    pub from: String,
    pub from_port: String,
    pub to: String,
    pub to_port: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        let model = GraphLinksModel::new(
            vec![NodeRecord {
                key: "R1".to_string(),
                category: "Link".to_string(),
                geometry_string: Some("M0 0 ".to_string()),
                connections: Some(vec![PortRecord {
                    port_id: "in".to_string(),
                    x: "0".to_string(),
                    y: "0.5".to_string(),
                }]),
                ..Default::default()
            }],
            vec![LinkRecord {
                label: "0".to_string(),
                from: "R1".to_string(),
                from_port: "in".to_string(),
                to: "1".to_string(),
                to_port: "0".to_string(),
            }],
        );
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["class"], "go.GraphLinksModel");
        assert_eq!(json["linkFromPortIdProperty"], "fromPort");
        assert_eq!(json["linkToPortIdProperty"], "toPort");
        assert_eq!(json["nodeDataArray"][0]["geometryString"], "M0 0 ");
        assert_eq!(json["nodeDataArray"][0]["connections"][0]["portId"], "in");
        assert!(json["nodeDataArray"][0].get("shapeText").is_none());
        assert_eq!(json["linkDataArray"][0]["fromPort"], "in");
        assert_eq!(json["linkDataArray"][0]["toPort"], "0");
    }

    #[test]
    fn test_reads_back() {
        let json = r#"{"class":"go.GraphLinksModel","linkFromPortIdProperty":"fromPort",
            "linkToPortIdProperty":"toPort",
            "nodeDataArray":[{"key":"1","category":"Node","pos":"0 0","size":"1 1","text":"Node1","angle":"0"}],
            "linkDataArray":[]}"#;
        let model: GraphLinksModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.node("1").unwrap().text, "Node1");
        assert!(model.node("1").unwrap().geometry_string.is_none());
    }
}
