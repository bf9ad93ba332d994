//! Route declarations: the input handed over by metadata extraction.
//!
//! Declarations are grouped per handler class. The class carries defaults
//! (prefix, verbs, suffixes, pipes, MIME and wrap hints) that each method
//! route inherits unless it overrides them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::method::Method;

/// A method-level hint that may inherit, override, or clear the class default.
///
/// In a JSON manifest an absent field is [`Override::Inherit`], `null` is
/// [`Override::Clear`] and a string is [`Override::Set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Override<T> {
    /// Use the class-level default.
    #[default]
    Inherit,
    /// Explicitly empty, whatever the class default is.
    Clear,
    /// Replace the class-level default.
    Set(T),
}

impl<T> Override<T> {
    /// Returns `true` when the class default applies.
    #[must_use]
    pub const fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }
}

impl<T: Clone> Override<T> {
    /// Resolves this hint against a class default.
    #[must_use]
    pub fn resolve(&self, default: Option<&T>) -> Option<T> {
        match self {
            Self::Inherit => default.cloned(),
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Override<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Clear, Self::Set))
    }
}

impl<T: Serialize> Serialize for Override<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Inherit | Self::Clear => serializer.serialize_none(),
        }
    }
}

/// Describes one parameter of a handler method.
///
/// Passed through to the compiled entry untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Declared type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Whether the parameter may be omitted.
    #[serde(default)]
    pub optional: bool,
    /// Default value, rendered as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterDescriptor {
    /// Creates a required parameter descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    /// Marks the parameter optional with a default value.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.optional = true;
        self.default = Some(default.into());
        self
    }
}

/// A method-level route declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteDeclaration {
    /// Handler method name.
    pub method: String,
    /// Route fragment appended to the class prefix.
    pub route: String,
    /// Unique symbolic name for reverse lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Verbs; `None` inherits the class verbs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbs: Option<Vec<Method>>,
    /// Allowed suffixes; `None` inherits the class suffixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<Vec<String>>,
    /// Pipes appended after the class pipes.
    pub pipes: Vec<String>,
    /// Expected request MIME type.
    #[serde(skip_serializing_if = "Override::is_inherit")]
    pub mimein: Override<String>,
    /// Response MIME type.
    #[serde(skip_serializing_if = "Override::is_inherit")]
    pub mimeout: Override<String>,
    /// Request unwrapper.
    #[serde(skip_serializing_if = "Override::is_inherit")]
    pub wrapin: Override<String>,
    /// Response wrapper.
    #[serde(skip_serializing_if = "Override::is_inherit")]
    pub wrapout: Override<String>,
    /// Error wrapper.
    #[serde(skip_serializing_if = "Override::is_inherit")]
    pub wraperr: Override<String>,
    /// Handler parameters, passed through.
    pub parameters: Vec<ParameterDescriptor>,
    /// Excludes the method from routing.
    pub not_route: bool,
}

impl RouteDeclaration {
    /// Creates a declaration for `method` at `route`.
    pub fn new(method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            route: route.into(),
            ..Self::default()
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Overrides the class verbs.
    #[must_use]
    pub fn verbs<I, M>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Method>,
    {
        self.verbs = Some(verbs.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the class suffix whitelist.
    #[must_use]
    pub fn suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = Some(suffixes.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a pipe.
    #[must_use]
    pub fn pipe(mut self, pipe: impl Into<String>) -> Self {
        self.pipes.push(pipe.into());
        self
    }

    /// Sets the request MIME hint.
    #[must_use]
    pub fn mimein(mut self, hint: Override<String>) -> Self {
        self.mimein = hint;
        self
    }

    /// Sets the response MIME hint.
    #[must_use]
    pub fn mimeout(mut self, hint: Override<String>) -> Self {
        self.mimeout = hint;
        self
    }

    /// Sets the request unwrapper hint.
    #[must_use]
    pub fn wrapin(mut self, hint: Override<String>) -> Self {
        self.wrapin = hint;
        self
    }

    /// Sets the response wrapper hint.
    #[must_use]
    pub fn wrapout(mut self, hint: Override<String>) -> Self {
        self.wrapout = hint;
        self
    }

    /// Sets the error wrapper hint.
    #[must_use]
    pub fn wraperr(mut self, hint: Override<String>) -> Self {
        self.wraperr = hint;
        self
    }

    /// Adds a handler parameter descriptor.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Excludes this method from routing.
    #[must_use]
    pub fn not_route(mut self) -> Self {
        self.not_route = true;
        self
    }
}

/// Class-level declaration: defaults plus the method routes they apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDeclaration {
    /// Handler class identity.
    pub class: String,
    /// Prefix joined in front of every method route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Default verbs.
    pub verbs: Vec<Method>,
    /// Default suffix whitelist.
    pub suffixes: Vec<String>,
    /// Pipes run before any method-level pipe.
    pub pipes: Vec<String>,
    /// Default request MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimein: Option<String>,
    /// Default response MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimeout: Option<String>,
    /// Default request unwrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapin: Option<String>,
    /// Default response wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapout: Option<String>,
    /// Default error wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wraperr: Option<String>,
    /// Method routes.
    pub routes: Vec<RouteDeclaration>,
}

impl ClassDeclaration {
    /// Creates a class declaration with no defaults.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    /// Sets the route prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the default verbs.
    #[must_use]
    pub fn verbs<I, M>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Method>,
    {
        self.verbs = verbs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default suffix whitelist.
    #[must_use]
    pub fn suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a class-level pipe.
    #[must_use]
    pub fn pipe(mut self, pipe: impl Into<String>) -> Self {
        self.pipes.push(pipe.into());
        self
    }

    /// Sets the default request MIME type.
    #[must_use]
    pub fn mimein(mut self, mime: impl Into<String>) -> Self {
        self.mimein = Some(mime.into());
        self
    }

    /// Sets the default response MIME type.
    #[must_use]
    pub fn mimeout(mut self, mime: impl Into<String>) -> Self {
        self.mimeout = Some(mime.into());
        self
    }

    /// Sets the default request unwrapper.
    #[must_use]
    pub fn wrapin(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapin = Some(wrapper.into());
        self
    }

    /// Sets the default response wrapper.
    #[must_use]
    pub fn wrapout(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapout = Some(wrapper.into());
        self
    }

    /// Sets the default error wrapper.
    #[must_use]
    pub fn wraperr(mut self, wrapper: impl Into<String>) -> Self {
        self.wraperr = Some(wrapper.into());
        self
    }

    /// Adds a method route.
    #[must_use]
    pub fn route(mut self, route: RouteDeclaration) -> Self {
        self.routes.push(route);
        self
    }
}

/// Splits a comma-separated verb list, trimming and upper-casing each entry.
#[must_use]
pub fn split_verbs(value: &str) -> Vec<Method> {
    split_list(value).map(Method::parse).collect()
}

/// Splits a comma-separated suffix list, trimming and lower-casing each entry.
#[must_use]
pub fn split_suffixes(value: &str) -> Vec<String> {
    split_list(value).map(str::to_lowercase).collect()
}

/// Splits a comma-separated pipe list.
#[must_use]
pub fn split_pipes(value: &str) -> Vec<String> {
    split_list(value).map(str::to_string).collect()
}

/// Normalizes a route fragment: trims each segment and drops empty ones.
#[must_use]
pub fn normalize_route(value: &str) -> String {
    value
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
