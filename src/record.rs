use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::params::ParameterSet;
use crate::resolve::ModelTarget;

/// Field names a result record adds on top of the challenge.
const RESULT_FIELDS: &[&str] = &["answer", "params", "model", "runtime"];

/// A challenge together with the answer it received and how it was obtained.
///
/// Serializes flat: the challenge's own fields followed by `answer`,
/// `params`, `model` and `runtime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub answer: String,
    pub params: ParameterSet,
    pub model: String,
    pub runtime: String,
}

impl ResultRecord {
    /// Copies `challenge` and attaches the result fields.
    ///
    /// Input fields sharing a name with a result field are superseded.
    pub fn new(
        challenge: &Challenge,
        answer: String,
        params: &ParameterSet,
        target: &ModelTarget,
    ) -> Self {
        let mut challenge = challenge.clone();
        challenge
            .extra
            .retain(|key, _| !RESULT_FIELDS.contains(&key.as_str()));
        Self {
            challenge,
            answer,
            params: params.clone(),
            model: target.reported_model.clone(),
            runtime: target.runtime.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn target() -> ModelTarget {
        ModelTarget {
            invoke_model: "openai/chatgpt".to_string(),
            reported_model: "model-name".to_string(),
            runtime: "llamacpp".to_string(),
        }
    }

    #[test]
    fn serializes_flat_with_original_fields() {
        let mut challenge = Challenge::new("t1", "python", "hi");
        challenge.extra.insert("Request".to_string(), json!("x"));
        let record =
            ResultRecord::new(&challenge, "ok".into(), &ParameterSet::default(), &target());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "t1",
                "language": "python",
                "prompt": "hi",
                "Request": "x",
                "answer": "ok",
                "params": {},
                "model": "model-name",
                "runtime": "llamacpp",
            })
        );
    }

    #[test]
    fn result_fields_supersede_input_fields() {
        let mut challenge = Challenge::new("t1", "python", "hi");
        challenge.extra.insert("answer".to_string(), json!("stale"));
        let record =
            ResultRecord::new(&challenge, "fresh".into(), &ParameterSet::default(), &target());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["answer"], json!("fresh"));
        assert_eq!(challenge.extra.get("answer"), Some(&json!("stale")));
    }
}
