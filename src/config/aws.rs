//! AWS SDK configuration
//!
//! Builds the DynamoDB and Translate clients, honouring custom endpoints for
//! DynamoDB Local / LocalStack.

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::Client as DynamoDbSdkClient;
use aws_sdk_translate::Client as TranslateSdkClient;

use crate::config::Settings;

/// AWS configuration builder
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base SDK configuration (region from settings, default credential chain)
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let region_provider = RegionProviderChain::first_try(Region::new(self.settings.aws_region.clone()))
            .or_default_provider();

        aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await
    }

    /// Create a DynamoDB client, using `DYNAMODB_ENDPOINT_URL` when set
    pub async fn build_dynamodb_client(&self) -> DynamoDbSdkClient {
        let sdk_config = self.build_sdk_config().await;

        if let Some(endpoint_url) = &self.settings.dynamodb_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom DynamoDB endpoint");

            let dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            DynamoDbSdkClient::from_conf(dynamodb_config)
        } else {
            DynamoDbSdkClient::new(&sdk_config)
        }
    }

    /// Create a Translate client, using `TRANSLATE_ENDPOINT_URL` when set
    pub async fn build_translate_client(&self) -> TranslateSdkClient {
        let sdk_config = self.build_sdk_config().await;

        if let Some(endpoint_url) = &self.settings.translate_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom Translate endpoint");

            let translate_config = aws_sdk_translate::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            TranslateSdkClient::from_conf(translate_config)
        } else {
            TranslateSdkClient::new(&sdk_config)
        }
    }
}

/// Create a DynamoDB client from settings
pub async fn create_dynamodb_client(settings: &Settings) -> DynamoDbSdkClient {
    AwsConfigBuilder::new(settings).build_dynamodb_client().await
}

/// Create a Translate client from settings
pub async fn create_translate_client(settings: &Settings) -> TranslateSdkClient {
    AwsConfigBuilder::new(settings).build_translate_client().await
}
