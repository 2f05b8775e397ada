//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Default lifetime of presigned read URLs
const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 60 * 60;

/// Default HTTP port
const DEFAULT_PORT: u16 = 8080;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// An unset `APP_ENV` selects `Production`: real AWS endpoints and the fixed
    /// URL lifetime. `LocalStack` and the expiry override need `APP_ENV=development`.
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket holding the gallery images
    ///
    /// `None` when `S3_BUCKET_NAME` is unset or blank. The server still starts;
    /// listing requests fail until the bucket is configured.
    #[must_use]
    pub fn s3_bucket(&self) -> Option<String> {
        env::var("S3_BUCKET_NAME")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Port the HTTP server listens on (`PORT`, defaults to 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number
    pub fn port(&self) -> Result<u16, std::num::ParseIntError> {
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |p| p.trim().parse())
    }

    /// Directory holding the static web client (`STATIC_DIR`, defaults to `static`)
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        env::var("STATIC_DIR").map_or_else(|_| PathBuf::from("static"), PathBuf::from)
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // LocalStack needs path-style addressing
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Presigned URL expiry time in seconds
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => DEFAULT_PRESIGNED_URL_EXPIRY_SECS,
            Self::Development {
                presign_expiry_override,
            } => presign_expiry_override.unwrap_or(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
        }
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test production (default)
        env::remove_var("APP_ENV");
        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::set_var("APP_ENV", "development");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_default_stage_ignores_development_settings() {
        env::remove_var("APP_ENV");
        env::set_var("S3_BUCKET_NAME", "prod-bucket");
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "5");

        let env = Environment::from_env();
        assert_eq!(env, Environment::Production);
        assert_eq!(env.override_aws_endpoint_url(), None);
        assert_eq!(env.presigned_url_expiry_secs(), 3600);
        assert_eq!(env.s3_bucket(), Some("prod-bucket".to_string()));

        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        env::remove_var("S3_BUCKET_NAME");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_s3_bucket() {
        let env = Environment::Production;

        env::remove_var("S3_BUCKET_NAME");
        assert_eq!(env.s3_bucket(), None);

        env::set_var("S3_BUCKET_NAME", "   ");
        assert_eq!(env.s3_bucket(), None);

        env::set_var("S3_BUCKET_NAME", "gallery-images");
        assert_eq!(env.s3_bucket(), Some("gallery-images".to_string()));

        env::remove_var("S3_BUCKET_NAME");
    }

    #[test]
    #[serial]
    fn test_port() {
        let env = Environment::Staging;

        env::remove_var("PORT");
        assert_eq!(env.port(), Ok(8080));

        env::set_var("PORT", "3000");
        assert_eq!(env.port(), Ok(3000));

        env::set_var("PORT", "not-a-port");
        assert!(env.port().is_err());

        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn test_static_dir() {
        let env = Environment::Production;

        env::remove_var("STATIC_DIR");
        assert_eq!(env.static_dir(), PathBuf::from("static"));

        env::set_var("STATIC_DIR", "/srv/gallery");
        assert_eq!(env.static_dir(), PathBuf::from("/srv/gallery"));

        env::remove_var("STATIC_DIR");
    }

    #[test]
    fn test_presigned_url_expiry_secs() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.presigned_url_expiry_secs(), 3600);

        let env = Environment::Development {
            presign_expiry_override: Some(30),
        };
        assert_eq!(env.presigned_url_expiry_secs(), 30);

        // Production and Staging always use the default
        assert_eq!(Environment::Production.presigned_url_expiry_secs(), 3600);
        assert_eq!(Environment::Staging.presigned_url_expiry_secs(), 3600);
    }

    #[test]
    #[serial]
    fn test_development_with_env_override() {
        env::set_var("APP_ENV", "development");
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "120");

        let env = Environment::from_env();
        assert_eq!(
            env,
            Environment::Development {
                presign_expiry_override: Some(120)
            }
        );
        assert_eq!(env.presigned_url_expiry_secs(), 120);

        // Invalid value falls back to None
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "invalid");
        let env = Environment::from_env();
        assert_eq!(
            env,
            Environment::Development {
                presign_expiry_override: None
            }
        );
        assert_eq!(env.presigned_url_expiry_secs(), 3600);

        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        env::remove_var("APP_ENV");
    }

    #[test]
    fn test_docs_and_logging_by_stage() {
        let dev = Environment::Development {
            presign_expiry_override: None,
        };
        assert!(dev.show_api_docs());
        assert!(!dev.json_logs());
        assert_eq!(dev.override_aws_endpoint_url(), Some("http://localhost:4566"));

        assert!(Environment::Staging.show_api_docs());
        assert!(Environment::Staging.json_logs());

        assert!(!Environment::Production.show_api_docs());
        assert!(Environment::Production.json_logs());
        assert_eq!(Environment::Production.override_aws_endpoint_url(), None);
    }
}
