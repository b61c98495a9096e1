//! Ordered middleware pipeline.

use std::sync::Arc;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered list of middleware stages.
///
/// Stages run in the order they were added, then the handler.
///
/// # Example
///
/// ```
/// use eidos_middleware::stages::{MultipartFormDataMiddleware, RequestIdMiddleware};
/// use eidos_middleware::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .stage(RequestIdMiddleware::new())
///     .stage(MultipartFormDataMiddleware::default())
///     .build();
///
/// assert_eq!(pipeline.stage_names(), vec!["request_id", "multipart_form_data"]);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs `request` through every stage and then `handler`.
    pub async fn process<H>(&self, mut ctx: MiddlewareContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        let next = self.build_chain(handler);
        next.run(&mut ctx, request).await
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut MiddlewareContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async move {
                self.log.lock().unwrap().push(format!("{}:before", self.name));
                let response = next.run(ctx, request).await;
                self.log.lock().unwrap().push(format!("{}:after", self.name));
                response
            })
        }
    }

    struct ShortCircuit;

    impl Middleware for ShortCircuit {
        fn name(&self) -> &'static str {
            "short_circuit"
        }

        fn process<'a>(
            &'a self,
            _ctx: &'a mut MiddlewareContext,
            _request: Request,
            _next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async {
                http::Response::builder()
                    .status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        }
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn ok_handler(
        log: Arc<Mutex<Vec<String>>>,
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> {
        move |_ctx, _req| {
            log.lock().unwrap().push("handler".to_string());
            Box::pin(async {
                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Recorder { name: "a", log: log.clone() })
            .stage(Recorder { name: "b", log: log.clone() })
            .build();

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.stage_names(), vec!["a", "b"]);

        let response = pipeline
            .process(MiddlewareContext::new(), request(), ok_handler(log.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:before", "b:before", "handler", "b:after", "a:after"]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Recorder { name: "a", log: log.clone() })
            .stage(ShortCircuit)
            .build();

        let response = pipeline
            .process(MiddlewareContext::new(), request(), ok_handler(log.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(*log.lock().unwrap(), vec!["a:before", "a:after"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline_calls_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::default();

        let response = pipeline
            .process(MiddlewareContext::new(), request(), ok_handler(log.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["handler"]);
    }
}
