use aws_sdk_polly::Client as PollyClient;
use aws_sdk_s3::Client as S3Client;

/// Nothing listens here, every request fails to connect
const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1";

pub fn create_unreachable_polly_client() -> PollyClient {
    let config = aws_sdk_polly::Config::builder()
        .behavior_version(aws_sdk_polly::config::BehaviorVersion::latest())
        .region(aws_sdk_polly::config::Region::new("us-east-1"))
        .credentials_provider(aws_sdk_polly::config::Credentials::new(
            "test", "test", None, None, "test",
        ))
        .retry_config(aws_sdk_polly::config::retry::RetryConfig::disabled())
        .endpoint_url(UNREACHABLE_ENDPOINT)
        .build();

    PollyClient::from_conf(config)
}

pub fn create_unreachable_s3_client() -> S3Client {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            "test", "test", None, None, "test",
        ))
        .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
        .endpoint_url(UNREACHABLE_ENDPOINT)
        .force_path_style(true)
        .build();

    S3Client::from_conf(config)
}

pub fn mock_audio_bytes() -> Vec<u8> {
    // Minimal valid MP3 file (silence)
    vec![
        0xFF, 0xFB, 0x90, 0x00, // MP3 frame header
        0x00, 0x00, 0x00, 0x00, // Some padding
    ]
}
