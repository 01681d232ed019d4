use thiserror::Error;

#[derive(Debug, Error)]
pub enum PccError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Prisma(#[from] crate::prisma::PrismaError),

    #[error(transparent)]
    Resource(#[from] crate::resource::ResourceError),

    #[error("invalid policy configuration: {0}")]
    Schema(#[from] crate::schema::SchemaError),

    #[error(transparent)]
    State(#[from] crate::terraform::StateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {resource}.{name} in state")]
    NotInState { resource: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_in_state_display() {
        let err = PccError::NotInState {
            resource: "prismacloudcompute_policies_compliance_host".to_string(),
            name: "this".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no prismacloudcompute_policies_compliance_host.this in state"
        );
    }

    #[test]
    fn test_schema_error_from_conversion() {
        let schema_err = crate::schema::SchemaError::UnknownAttribute {
            path: "rulez".to_string(),
        };
        let err: PccError = schema_err.into();
        assert!(matches!(err, PccError::Schema(_)));
        assert_eq!(
            err.to_string(),
            "invalid policy configuration: unknown attribute 'rulez'"
        );
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: PccError = io_err.into();
        assert!(matches!(err, PccError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: PccError = crate::config::ConfigError::Missing("username").into();
        assert_eq!(err.to_string(), "missing required setting 'username'");
    }
}
