//! 算法配置
//!
//! 数值容差与搜索上限，可从 JSON 加载

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 默认浮点容差
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// 算法配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// 浮点容差：用于删除耗尽的残量边、松弛判定、平衡校验和源汇判定
    pub epsilon: f64,
    /// 穷举搜索（TSP）允许展开的最大帧数，`None` 表示不限
    pub search_limit: Option<u64>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            search_limit: None,
        }
    }
}

impl AlgorithmConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_search_limit(mut self, limit: u64) -> Self {
        self.search_limit = Some(limit);
        self
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()
    }

    /// 从 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self =
            serde_json::from_reader(reader).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::ConfigError(format!(
                "epsilon 必须是非负有限数, 实际为 {}",
                self.epsilon
            )));
        }
        Ok(self)
    }
}
