//! The middleware trait and chain continuation.
//!
//! # Example
//!
//! ```
//! use eidos_middleware::{BoxFuture, Middleware, MiddlewareContext, Next, Request, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?ctx.elapsed(), "request finished");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request processing stage.
///
/// A stage receives the request context, the request, and a [`Next`] that
/// continues the chain. It either calls `next.run()` once or short-circuits
/// with its own response. Work done after `next.run()` returns sees the
/// handler's response; state owned by the stage's future lives until then.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the stage name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The handler at the end of a chain.
pub type Handler<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>;

/// Continuation to the rest of the chain.
///
/// Consumed by [`run`](Self::run), so it can be invoked at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(Handler<'a>),
}

impl<'a> Next<'a> {
    /// Creates a continuation that runs `middleware`, then `next`.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal continuation that invokes the handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next stage or the handler.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                tracing::trace!(stage = middleware.name(), "entering middleware");
                middleware.process(ctx, request, *next).await
            }
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}
