//! Resolver registry (component D).
//!
//! Maps `(parent_type_name, field_name)` to a resolver function, falling
//! back to by-name lookup on the parent object when nothing is registered,
//! exactly as §4.D specifies.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::FieldError;
use crate::value::{Arguments, Value};

/// A resolver's synchronous or asynchronous outcome (§6 "Resolver
/// callable"). A sync resolver returns `Ready` without boxing a future just
/// to return a constant; an async one returns `Pending`.
pub enum ResolverOutcome {
    Ready(FieldResult),
    Pending(BoxFuture<'static, FieldResult>),
}

impl ResolverOutcome {
    pub async fn resolve(self) -> FieldResult {
        match self {
            ResolverOutcome::Ready(v) => v,
            ResolverOutcome::Pending(fut) => fut.await,
        }
    }
}

/// What a resolver returns for a union/interface-typed field: the value
/// plus, since the engine cannot otherwise recover it from a bare `Value`,
/// the name of the concrete object type it resolved to (§9 Open Question
/// (i)).
#[derive(Debug, Clone)]
pub struct ResolvedValue {
    pub value: Value,
    pub concrete_type_name: Option<String>,
}

impl ResolvedValue {
    pub fn new(value: Value) -> Self {
        ResolvedValue {
            value,
            concrete_type_name: None,
        }
    }

    pub fn with_type_name(value: Value, type_name: impl Into<String>) -> Self {
        ResolvedValue {
            value,
            concrete_type_name: Some(type_name.into()),
        }
    }
}

pub type FieldResult = Result<ResolvedValue, FieldError>;

/// A host-supplied field resolver. `context` is opaque to the engine.
pub type Resolver<Ctx> =
    Arc<dyn Fn(&Ctx, &Value, Option<&Arguments>) -> ResolverOutcome + Send + Sync>;

/// `(parent_type_name, field_name) -> resolver`, with the §4.D default
/// substituted for anything not explicitly registered.
pub struct ResolverRegistry<Ctx> {
    resolvers: HashMap<(String, String), Resolver<Ctx>>,
}

impl<Ctx> Default for ResolverRegistry<Ctx> {
    fn default() -> Self {
        ResolverRegistry {
            resolvers: HashMap::new(),
        }
    }
}

impl<Ctx: Send + Sync + 'static> ResolverRegistry<Ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a `{type_name -> {field_name -> resolver}}`
    /// map, the shape §4.D's construction takes.
    pub fn from_map(map: HashMap<String, HashMap<String, Resolver<Ctx>>>) -> Self {
        let mut resolvers = HashMap::new();
        for (type_name, fields) in map {
            for (field_name, resolver) in fields {
                resolvers.insert((type_name.clone(), field_name), resolver);
            }
        }
        ResolverRegistry { resolvers }
    }

    pub fn register(&mut self, type_name: impl Into<String>, field_name: impl Into<String>, resolver: Resolver<Ctx>) {
        self.resolvers
            .insert((type_name.into(), field_name.into()), resolver);
    }

    /// Returns the registered resolver, or the default by-name lookup
    /// resolver if none was registered for this `(type, field)` pair.
    pub fn lookup(&self, parent_type_name: &str, field_name: &str) -> Resolver<Ctx> {
        if let Some(r) = self
            .resolvers
            .get(&(parent_type_name.to_string(), field_name.to_string()))
        {
            return Arc::clone(r);
        }
        default_resolver(field_name)
    }
}

/// The default resolver (§4.D): a by-name lookup on the parent value,
/// yielding `Value::Null` when the key is absent rather than failing.
fn default_resolver<Ctx: 'static>(field_name: &str) -> Resolver<Ctx> {
    let field_name = field_name.to_string();
    Arc::new(move |_ctx: &Ctx, parent: &Value, _args: Option<&Arguments>| {
        let value = parent
            .as_object()
            .and_then(|obj| obj.get(&field_name))
            .cloned()
            .unwrap_or(Value::Null);
        ResolverOutcome::Ready(Ok(ResolvedValue::new(value)))
    })
}

/// Convenience constructor for a synchronous resolver closure.
pub fn sync<Ctx, F>(f: F) -> Resolver<Ctx>
where
    Ctx: 'static,
    F: Fn(&Ctx, &Value, Option<&Arguments>) -> FieldResult + Send + Sync + 'static,
{
    Arc::new(move |ctx: &Ctx, parent: &Value, args: Option<&Arguments>| {
        ResolverOutcome::Ready(f(ctx, parent, args))
    })
}

/// Convenience constructor for an async resolver closure. `f` receives
/// owned clones of its inputs so the future it returns can be `'static`
/// without borrowing past the resolver call.
pub fn async_fn<Ctx, F, Fut>(f: F) -> Resolver<Ctx>
where
    Ctx: Clone + Send + Sync + 'static,
    F: Fn(Ctx, Value, Option<Arguments>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = FieldResult> + Send + 'static,
{
    Arc::new(move |ctx: &Ctx, parent: &Value, args: Option<&Arguments>| {
        let fut: Pin<Box<dyn std::future::Future<Output = FieldResult> + Send>> =
            Box::pin(f(ctx.clone(), parent.clone(), args.cloned()));
        ResolverOutcome::Pending(fut)
    })
}
