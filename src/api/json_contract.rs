use serde::{Deserialize, Serialize};

use crate::error::{BucketError, BucketResult};

use super::{HeatmapConfig, PipelineOutput};

pub const HEATMAP_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: HeatmapConfig,
}

impl HeatmapConfig {
    pub fn to_json_contract_v1_pretty(&self) -> BucketResult<String> {
        let payload = HeatmapConfigJsonContractV1 {
            schema_version: HEATMAP_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            BucketError::InvalidConfig(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Parses either a bare config object or a versioned v1 contract, then
    /// validates it.
    pub fn from_json_compat_str(input: &str) -> BucketResult<Self> {
        let header: SchemaVersionHeader = serde_json::from_str(input)
            .map_err(|e| BucketError::InvalidConfig(format!("failed to parse config json: {e}")))?;

        let config = match header.schema_version {
            Some(HEATMAP_CONFIG_JSON_SCHEMA_V1) => {
                let payload: HeatmapConfigJsonContractV1 =
                    serde_json::from_str(input).map_err(|e| {
                        BucketError::InvalidConfig(format!("failed to parse config contract: {e}"))
                    })?;
                payload.config
            }
            Some(version) => {
                return Err(BucketError::InvalidConfig(format!(
                    "unsupported config schema version: {version}"
                )));
            }
            None => serde_json::from_str::<HeatmapConfig>(input)
                .map_err(|e| BucketError::InvalidConfig(format!("failed to parse config: {e}")))?,
        };

        config.validate()
    }
}

/// Version key of a config payload; every other key is ignored.
#[derive(Deserialize)]
struct SchemaVersionHeader {
    #[serde(default)]
    schema_version: Option<u32>,
}

impl<K: Serialize, T: Serialize> PipelineOutput<K, T> {
    /// Renderer-facing JSON frame.
    pub fn to_json_pretty(&self) -> BucketResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            BucketError::InvalidData(format!("failed to serialize pipeline output: {e}"))
        })
    }
}
