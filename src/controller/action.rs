use crate::error::DispatchError;
use crate::response::Response;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Method names that can never be dispatched as actions.
pub const RESERVED_METHODS: &[&str] = &["new", "pre_dispatch", "post_dispatch"];

/// Normalized outcome of an action handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Returned to the caller as-is; no view is rendered
    Response(Response),
    /// Body for a response built from the context's response template
    Text(String),
    /// Nothing produced; the view is auto-rendered when enabled
    Empty,
}

/// Conversion from an action method's return type into [`ActionResult`].
///
/// Implemented for `()`, `String`, `&str`, [`Response`], `Option<T>` and
/// `Result<T, E>` where `E` converts into [`DispatchError`] (which includes
/// `anyhow::Error`).
pub trait IntoActionResult {
    fn into_action_result(self) -> Result<ActionResult, DispatchError>;
}

impl IntoActionResult for ActionResult {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        Ok(self)
    }
}

impl IntoActionResult for () {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        Ok(ActionResult::Empty)
    }
}

impl IntoActionResult for String {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        Ok(ActionResult::Text(self))
    }
}

impl IntoActionResult for &str {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        Ok(ActionResult::Text(self.to_string()))
    }
}

impl IntoActionResult for Response {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        Ok(ActionResult::Response(self))
    }
}

impl<T: IntoActionResult> IntoActionResult for Option<T> {
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        match self {
            Some(inner) => inner.into_action_result(),
            None => Ok(ActionResult::Empty),
        }
    }
}

impl<T, E> IntoActionResult for Result<T, E>
where
    T: IntoActionResult,
    E: Into<DispatchError>,
{
    fn into_action_result(self) -> Result<ActionResult, DispatchError> {
        self.map_err(Into::into)?.into_action_result()
    }
}

/// Conversion of a bound parameter value into an action argument.
///
/// Query strings and form bodies carry everything as strings, so scalar
/// conversions accept their textual form too (`"42"` → `42`).
pub trait FromParam: Sized {
    fn from_param(value: &Value) -> Result<Self, String>;
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FromParam for Value {
    fn from_param(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromParam for String {
    fn from_param(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(format!("expected a string, found {}", kind_of(other))),
        }
    }
}

impl FromParam for bool {
    fn from_param(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(format!("expected a boolean, found {}", n)),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" | "" => Ok(false),
                _ => Err(format!("expected a boolean, found '{}'", s)),
            },
            other => Err(format!("expected a boolean, found {}", kind_of(other))),
        }
    }
}

macro_rules! int_from_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                fn from_param(value: &Value) -> Result<Self, String> {
                    match value {
                        Value::Number(n) => {
                            let converted = if let Some(i) = n.as_i64() {
                                <$ty>::try_from(i).ok()
                            } else {
                                n.as_u64().and_then(|u| <$ty>::try_from(u).ok())
                            };
                            converted.ok_or_else(|| {
                                format!("{} is out of range for {}", n, stringify!($ty))
                            })
                        }
                        Value::String(s) => s.trim().parse::<$ty>().map_err(|_| {
                            format!("expected {}, found '{}'", stringify!($ty), s)
                        }),
                        other => Err(format!(
                            "expected {}, found {}",
                            stringify!($ty),
                            kind_of(other)
                        )),
                    }
                }
            }
        )*
    };
}

int_from_param!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! float_from_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                #[allow(clippy::cast_possible_truncation)]
                fn from_param(value: &Value) -> Result<Self, String> {
                    match value {
                        Value::Number(n) => n
                            .as_f64()
                            .map(|f| f as $ty)
                            .ok_or_else(|| format!("{} is not representable as {}", n, stringify!($ty))),
                        Value::String(s) => s.trim().parse::<$ty>().map_err(|_| {
                            format!("expected {}, found '{}'", stringify!($ty), s)
                        }),
                        other => Err(format!(
                            "expected {}, found {}",
                            stringify!($ty),
                            kind_of(other)
                        )),
                    }
                }
            }
        )*
    };
}

float_from_param!(f32, f64);

impl<T: FromParam> FromParam for Option<T> {
    fn from_param(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_param(other).map(Some),
        }
    }
}

impl<T: FromParam> FromParam for Vec<T> {
    fn from_param(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items.iter().map(T::from_param).collect(),
            Value::Null => Ok(Vec::new()),
            scalar => Ok(vec![T::from_param(scalar)?]),
        }
    }
}

/// Whether an action can be reached through dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Callable from Rust code only; dispatch reports it as not found
    Protected,
}

/// A formal parameter of an action method.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    name: &'static str,
    default: Option<Value>,
}

impl ParamSpec {
    /// Parameter with no default; binding fails if no value is found.
    #[must_use]
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            default: Some(default.into()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Bound positional arguments, in formal parameter order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionArgs {
    method: &'static str,
    names: Vec<&'static str>,
    values: Vec<Value>,
}

impl ActionArgs {
    pub(crate) fn new(method: &'static str, names: Vec<&'static str>, values: Vec<Value>) -> Self {
        Self {
            method,
            names,
            values,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Look up a bound value by parameter name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.values.get(i))
    }

    /// Convert the argument at `index` to the handler's parameter type.
    pub fn extract<T: FromParam>(&self, index: usize) -> Result<T, DispatchError> {
        let (Some(name), Some(value)) = (self.names.get(index), self.values.get(index)) else {
            return Err(DispatchError::InvalidUsage {
                method: self.method.to_string(),
                param: format!("#{}", index),
            });
        };
        T::from_param(value).map_err(|message| DispatchError::InvalidParameter {
            param: (*name).to_string(),
            message,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Typed handler stored in an action table.
pub type ActionFn<C> = fn(&mut C, &ActionArgs) -> Result<ActionResult, DispatchError>;

/// One dispatchable (or protected) method of controller type `C`.
pub struct ActionDef<C> {
    name: &'static str,
    visibility: Visibility,
    params: Vec<ParamSpec>,
    handler: ActionFn<C>,
}

impl<C> ActionDef<C> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub(crate) fn invoke(&self, controller: &mut C, args: &ActionArgs) -> Result<ActionResult, DispatchError> {
        (self.handler)(controller, args)
    }
}

impl<C> fmt::Debug for ActionDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Method-name → handler table for controller type `C`.
///
/// Built once per type, normally by the `#[actions]` attribute. A later
/// registration under the same name replaces the earlier one.
pub struct ActionTable<C> {
    actions: HashMap<&'static str, ActionDef<C>>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for ActionTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionTable").field("actions", &names).finish()
    }
}

impl<C> ActionTable<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn public(
        self,
        name: &'static str,
        params: impl IntoIterator<Item = ParamSpec>,
        handler: ActionFn<C>,
    ) -> Self {
        self.insert(name, Visibility::Public, params, handler)
    }

    #[must_use]
    pub fn protected(
        self,
        name: &'static str,
        params: impl IntoIterator<Item = ParamSpec>,
        handler: ActionFn<C>,
    ) -> Self {
        self.insert(name, Visibility::Protected, params, handler)
    }

    fn insert(
        mut self,
        name: &'static str,
        visibility: Visibility,
        params: impl IntoIterator<Item = ParamSpec>,
        handler: ActionFn<C>,
    ) -> Self {
        self.actions.insert(
            name,
            ActionDef {
                name,
                visibility,
                params: params.into_iter().collect(),
                handler,
            },
        );
        self
    }

    #[must_use]
    pub fn get(&self, method: &str) -> Option<&ActionDef<C>> {
        self.actions.get(method)
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
