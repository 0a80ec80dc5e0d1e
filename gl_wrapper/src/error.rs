use std::fmt;

use thiserror::Error;

use crate::context::ShaderStage;

/// Fatal GL failures. None of these are retried: the shader sources are
/// static, so a failure points at the driver or the embedded source.
#[derive(Debug, Error)]
pub enum GlError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("could not create {0} object")]
    ResourceCreation(ResourceKind),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Shader,
    Program,
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Shader => f.write_str("shader"),
            ResourceKind::Program => f.write_str("program"),
            ResourceKind::Texture => f.write_str("texture"),
        }
    }
}
