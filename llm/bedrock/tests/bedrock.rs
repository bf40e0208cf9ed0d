//! Offline provider tests: model validation and capability errors.

use aws_credential_types::Credentials;
use aws_sdk_bedrockruntime::config::{BehaviorVersion, Region};
use futures_util::{StreamExt, pin_mut};
use llm::{ChatCompletionRequest, ChatMessage, CompletionRequest, EmbeddingsRequest, Error, Provider};
use unillm_bedrock::{Bedrock, SUPPORTED_MODELS};

fn provider() -> Bedrock {
    let config = aws_sdk_bedrockruntime::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::from_keys("AKIATEST", "secret", None))
        .build();
    Bedrock::new(aws_sdk_bedrockruntime::Client::from_conf(config))
}

#[tokio::test]
async fn unsupported_models_are_rejected_with_the_allowlist() {
    let request =
        ChatCompletionRequest::new(vec![ChatMessage::user("Hi")]).with_model("anthropic.claude-v1");
    let err = provider().chat(&request).await.unwrap_err();
    match err {
        Error::Config(message) => {
            assert!(message.contains("anthropic.claude-v1"));
            for model in SUPPORTED_MODELS {
                assert!(message.contains(model), "missing {model} in: {message}");
            }
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[tokio::test]
async fn a_model_is_required() {
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")]);
    assert!(matches!(
        provider().chat(&request).await.unwrap_err(),
        Error::Config(_)
    ));
}

#[tokio::test]
async fn streaming_an_unsupported_model_fails_before_any_call() {
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
        .with_model("mistral.mistral-7b")
        .with_stream(true);
    let provider = provider();
    let stream = provider.chat_stream(request);
    pin_mut!(stream);
    assert!(matches!(
        stream.next().await.unwrap(),
        Err(Error::Config(_))
    ));
}

#[tokio::test]
async fn streaming_more_than_one_choice_is_rejected() {
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
        .with_model("anthropic.claude-v2")
        .with_stream(true)
        .with_n(2);
    let provider = provider();
    let stream = provider.chat_stream(request);
    pin_mut!(stream);
    assert!(matches!(
        stream.next().await.unwrap(),
        Err(Error::StreamWithMultipleChoices { n: 2 })
    ));
}

#[tokio::test]
async fn text_completion_is_an_unsupported_capability() {
    let request = CompletionRequest::new("Hi").with_model("anthropic.claude-v2");
    assert!(matches!(
        provider().complete(&request).await.unwrap_err(),
        Error::Unsupported {
            provider: "bedrock",
            capability: "text completion"
        }
    ));

    let provider = provider();
    let stream = provider.complete_stream(request);
    pin_mut!(stream);
    assert!(matches!(
        stream.next().await.unwrap(),
        Err(Error::Unsupported { .. })
    ));
}

#[tokio::test]
async fn embeddings_are_an_unsupported_capability() {
    let request = EmbeddingsRequest::new("doc").with_model("anthropic.claude-v2");
    assert!(matches!(
        provider().embed(&request).await.unwrap_err(),
        Error::Unsupported {
            provider: "bedrock",
            capability: "embeddings"
        }
    ));
}
