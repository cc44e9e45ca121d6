use serde::{Deserialize, Serialize};

/// Input a saved Network declares it was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// Single-channel image models. Recognised only so that loading one
    /// fails with a clear mismatch instead of a parse error.
    ImageGrayscale { width: u32, height: u32 },
    /// RGB image resized to width×height, normalized to [0, 1], flattened as R,G,B,...
    ImageRgb { width: u32, height: u32 },
}

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so models without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input_type: Option<InputType>,
    /// Class labels for the output layer, in output order.
    pub output_labels: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_type_is_tagged_in_json() {
        let rgb: InputType = serde_json::from_str(r#"{"type":"ImageRgb","width":224,"height":224}"#).unwrap();
        assert_eq!(rgb, InputType::ImageRgb { width: 224, height: 224 });
        let gray: InputType =
            serde_json::from_str(r#"{"type":"ImageGrayscale","width":28,"height":28}"#).unwrap();
        assert_eq!(gray, InputType::ImageGrayscale { width: 28, height: 28 });
    }

    #[test]
    fn untyped_numeric_input_is_not_a_known_type() {
        assert!(serde_json::from_str::<InputType>(r#"{"type":"Numeric"}"#).is_err());
    }
}
