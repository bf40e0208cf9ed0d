//! Adapter tests against a mock SageMaker runtime endpoint.

use aws_credential_types::Credentials;
use futures_util::{StreamExt, pin_mut};
use llm::{
    ChatCompletionRequest, ChatMessage, CompletionRequest, EmbeddingsRequest, Error, FinishReason,
    Provider, Template,
};
use mockito::Matcher;
use unillm_sagemaker::SageMaker;

fn provider(base: String) -> SageMaker {
    SageMaker::new(
        Credentials::from_keys("AKIATEST", "secret", None),
        "us-east-1",
    )
    .with_api_base(base)
}

fn generation_body(text: &str, tokens: u32) -> String {
    serde_json::json!([{
        "generated_text": text,
        "details": {
            "finish_reason": "eos_token",
            "generated_tokens": tokens,
            "tokens": []
        }
    }])
    .to_string()
}

#[tokio::test]
async fn chat_signs_the_invocation() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/my-endpoint/invocations")
        .match_header(
            "authorization",
            Matcher::Regex("^AWS4-HMAC-SHA256 .*us-east-1/sagemaker/aws4_request".to_owned()),
        )
        .match_header("x-amz-date", Matcher::Any)
        .match_body(Matcher::PartialJson(serde_json::json!({
            "inputs": "<s>[INST] Hello! [/INST]"
        })))
        .with_body(generation_body("Hi there", 3))
        .create_async()
        .await;

    let sm = provider(server.url()).with_template(Template::Llama2);
    let request =
        ChatCompletionRequest::new(vec![ChatMessage::user("Hello!")]).with_model("my-endpoint");
    let response = sm.chat(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0].message.content, "Hi there");
    assert_eq!(
        response.choices[0].finish_reason,
        Some(FinishReason::EosToken)
    );
    assert_eq!(response.usage.completion_tokens, Some(3));
}

#[tokio::test]
async fn completion_aggregates_sequential_choices() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/my-endpoint/invocations")
        .with_body(generation_body(" there", 2))
        .expect(3)
        .create_async()
        .await;

    let sm = provider(server.url());
    let mut request = CompletionRequest::new("Hello").with_model("my-endpoint");
    request.n = 3;
    let response = sm.complete(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.choices.len(), 3);
    for (i, choice) in response.choices.iter().enumerate() {
        assert_eq!(choice.index, i as u32);
        assert_eq!(choice.text, " there");
    }
    assert_eq!(response.usage.completion_tokens, Some(6));
}

#[tokio::test]
async fn non_success_status_surfaces_the_raw_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/my-endpoint/invocations")
        .with_status(424)
        .with_body("endpoint failed")
        .create_async()
        .await;

    let sm = provider(server.url());
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")]).with_model("my-endpoint");
    match sm.chat(&request).await.unwrap_err() {
        Error::BackendStatus { status, detail } => {
            assert_eq!(status, 424);
            assert_eq!(detail, "endpoint failed");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn streaming_is_an_unsupported_capability() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/my-endpoint/invocations")
        .expect(0)
        .create_async()
        .await;

    let sm = provider(server.url());
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
        .with_model("my-endpoint")
        .with_stream(true);

    let stream = sm.chat_stream(request);
    pin_mut!(stream);
    let first = stream.next().await.unwrap();
    assert!(matches!(
        first,
        Err(Error::Unsupported {
            provider: "sagemaker",
            capability: "streaming"
        })
    ));
    assert!(stream.next().await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn embeddings_read_whichever_key_the_container_uses() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/embed/invocations")
        .with_body(r#"{"vectors":[[0.1,0.2],[0.3,0.4]]}"#)
        .create_async()
        .await;

    let sm = provider(server.url());
    let request = EmbeddingsRequest::new(vec!["first".to_owned(), "second".to_owned()])
        .with_model("embed");
    let response = sm.embed(&request).await.unwrap();

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[1].embedding, vec![0.3, 0.4]);
}

#[tokio::test]
async fn a_single_input_takes_the_first_vector() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/embed/invocations")
        .with_body(r#"{"predictions":[[0.5,0.6]]}"#)
        .create_async()
        .await;

    let sm = provider(server.url());
    let request = EmbeddingsRequest::new("one document").with_model("embed");
    let response = sm.embed(&request).await.unwrap();

    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].embedding, vec![0.5, 0.6]);
}

#[tokio::test]
async fn an_unrecognized_embedding_shape_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/embed/invocations")
        .with_body(r#"{"outputs":[[0.5]]}"#)
        .create_async()
        .await;

    let sm = provider(server.url());
    let request = EmbeddingsRequest::new("doc").with_model("embed");
    assert!(matches!(
        sm.embed(&request).await.unwrap_err(),
        Error::Backend(_)
    ));
}
