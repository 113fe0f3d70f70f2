//! Custom route parameters
//!
//! A custom parameter is declared in two steps: [`custom_param`] takes the
//! optional plain data attached to the declaration, and
//! [`CustomParam::handler`] takes the extraction function. The resulting
//! [`ParamDecorator`] is registered against a controller method and a
//! parameter index. On every request to that method the extractor runs with
//! the data and the request head, and its value is exposed through
//! [`RouteContext::custom`](crate::controller::RouteContext::custom).

use axum::http::request::Parts;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use trellis_core::{MetadataKey, MetadataStore};

/// Metadata key holding the ordered parameter list of a controller method
pub const ROUTE_PARAMS: MetadataKey = MetadataKey::new("trellis:route-params");

/// Extraction function for a custom parameter
pub type ParamExtractor = Arc<dyn Fn(Option<&Value>, &Parts) -> Value + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Custom,
}

/// One registered route parameter
#[derive(Clone)]
pub struct ParamDescriptor {
    pub kind: ParamKind,
    pub parameter_index: usize,
    pub data: Option<Value>,
    pub handler: ParamExtractor,
}

impl ParamDescriptor {
    /// Run the extractor against a request head
    pub fn extract(&self, parts: &Parts) -> Value {
        (self.handler)(self.data.as_ref(), parts)
    }
}

impl fmt::Debug for ParamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDescriptor")
            .field("kind", &self.kind)
            .field("parameter_index", &self.parameter_index)
            .field("data", &self.data)
            .finish()
    }
}

/// First stage: the declaration's data
#[derive(Debug, Clone, Default)]
pub struct CustomParam {
    data: Option<Value>,
}

/// Start a custom parameter declaration
pub fn custom_param(data: Option<Value>) -> CustomParam {
    CustomParam { data }
}

impl CustomParam {
    /// Second stage: the extraction handler
    pub fn handler<F>(self, handler: F) -> ParamDecorator
    where
        F: Fn(Option<&Value>, &Parts) -> Value + Send + Sync + 'static,
    {
        ParamDecorator {
            data: self.data,
            handler: Arc::new(handler),
        }
    }
}

/// A complete custom parameter, ready to attach to a controller method
#[derive(Clone)]
pub struct ParamDecorator {
    data: Option<Value>,
    handler: ParamExtractor,
}

impl ParamDecorator {
    /// Append this parameter to controller `C`'s `method` at `parameter_index`
    pub fn register<C: 'static>(
        &self,
        store: &mut MetadataStore,
        method: &'static str,
        parameter_index: usize,
    ) {
        let descriptor = ParamDescriptor {
            kind: ParamKind::Custom,
            parameter_index,
            data: self.data.clone(),
            handler: Arc::clone(&self.handler),
        };
        store.append(ROUTE_PARAMS, descriptor, TypeId::of::<C>(), Some(method));
    }
}

impl fmt::Debug for ParamDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDecorator")
            .field("data", &self.data)
            .finish()
    }
}

/// Parameters registered for controller `C`'s `method`, in registration order
pub fn params_for<'a, C: 'static>(
    store: &'a MetadataStore,
    method: &'static str,
) -> &'a [ParamDescriptor] {
    store.list::<ParamDescriptor>(ROUTE_PARAMS, TypeId::of::<C>(), Some(method))
}
