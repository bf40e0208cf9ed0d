//! Validation runs before any backend interaction: driving the panicking
//! stub with an invalid request surfaces the error without the panic firing.

use futures_util::{StreamExt, pin_mut};
use unillm::{
    ChatCompletionRequest, ChatMessage, CompletionRequest, Error, NoopProvider, Provider,
};

#[tokio::test]
async fn chat_stream_rejects_multiple_choices_before_any_backend_work() {
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
        .with_stream(true)
        .with_n(2);
    let stream = NoopProvider.chat_stream(request);
    pin_mut!(stream);
    let first = stream.next().await.unwrap();
    assert!(matches!(
        first,
        Err(Error::StreamWithMultipleChoices { n: 2 })
    ));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn complete_stream_rejects_multiple_choices_before_any_backend_work() {
    let mut request = CompletionRequest::new("Hi");
    request.stream = true;
    request.n = 3;
    let stream = NoopProvider.complete_stream(request);
    pin_mut!(stream);
    let first = stream.next().await.unwrap();
    assert!(matches!(
        first,
        Err(Error::StreamWithMultipleChoices { n: 3 })
    ));
}

#[tokio::test]
async fn chat_surfaces_validation_errors_without_reaching_a_backend() {
    let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
        .with_stream(true)
        .with_n(2);
    let err = NoopProvider.chat(&request).await.unwrap_err();
    assert!(matches!(err, Error::StreamWithMultipleChoices { n: 2 }));
}
