//! # Target Shapes — Descriptors for Schema-Directed Decoding
//!
//! A [`Shape`] describes what a dynamic value is expected to look like: a
//! scalar of a given classification, a named structure with typed fields,
//! or a homogeneous sequence of some element shape. The decode engine walks
//! a dynamic value and a `Shape` together and either constructs a typed
//! value or reports exactly where and how the two disagree.
//!
//! ## Design
//!
//! - `Shape` is a closed union of three forms. Everything the engine can
//!   decode is expressible in it, and everything it cannot decode is
//!   rejected while the schema is being built, not while a value is being
//!   decoded.
//! - Schemas are authored as [`TypeExpr`] declarations and resolved into
//!   shapes by [`TypeExpr::resolve`] (or by [`StructShape::builder`], which
//!   resolves every field). Disallowed and unsupported declarations fail
//!   here with a [`SchemaError`], before any value is touched.
//! - Nested structures embed an already-built [`Arc<StructShape>`], so a
//!   schema is always a finite tree. Self-referential schemas cannot be
//!   expressed.
//!
//! ## Thread Safety
//!
//! All shape types are immutable after construction and `Send + Sync`.
//! `Arc<StructShape>` is the sharing unit for structure descriptors.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::SchemaError;
use crate::profile::StructProfile;

// ─────────────────────────── Scalar classification ───────────────────────────

/// A named check for an arbitrary concrete scalar type.
///
/// With a predicate ([`ScalarCheck::new`]) the check accepts exactly the
/// dynamic values the predicate accepts. Without one ([`ScalarCheck::opaque`])
/// the check names a target the engine has no built-in rule for; such a
/// target is decodable only through a registered custom decoder, and fails
/// as `NotSupportedType` otherwise.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ScalarCheck {
    name: &'static str,
    check: Option<fn(&Value) -> bool>,
}

impl ScalarCheck {
    /// A named check backed by a predicate over the dynamic value.
    pub fn new(name: &'static str, check: fn(&Value) -> bool) -> Self {
        ScalarCheck { name, check: Some(check) }
    }

    /// A named target with no built-in decode rule.
    pub fn opaque(name: &'static str) -> Self {
        ScalarCheck { name, check: None }
    }

    /// The name of the checked target type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this check carries a predicate.
    pub fn has_rule(&self) -> bool {
        self.check.is_some()
    }

    /// Applies the predicate. An opaque check matches nothing.
    pub fn matches(&self, value: &Value) -> bool {
        match self.check {
            Some(check) => check(value),
            None => false,
        }
    }
}

impl fmt::Debug for ScalarCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCheck")
            .field("name", &self.name)
            .field("has_rule", &self.check.is_some())
            .finish()
    }
}

/// Classification of a scalar target.
///
/// The numeric classifications are disjoint: `5` is an integer and never a
/// float, `5.0` is a float and never an integer. Booleans do not satisfy
/// `Integer`, and `null` satisfies no built-in kind. The engine performs no
/// coercion in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// A boolean.
    Boolean,
    /// A whole number representable as `i64` or `u64`.
    Integer,
    /// A float-form number. Integer-form numbers do not satisfy this kind.
    Float,
    /// A string.
    Text,
    /// An arbitrary concrete type check, or an opaque registry-only target.
    Custom(ScalarCheck),
}

impl ScalarKind {
    /// Returns true if `value` satisfies this classification.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ScalarKind::Boolean => value.is_boolean(),
            ScalarKind::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            ScalarKind::Float => value.is_f64(),
            ScalarKind::Text => value.is_string(),
            ScalarKind::Custom(check) => check.matches(value),
        }
    }

    /// Returns true if this kind carries a decode rule at all.
    ///
    /// Only an opaque [`ScalarCheck`] has none; every other kind can accept
    /// or reject a value on its own.
    pub fn has_rule(&self) -> bool {
        match self {
            ScalarKind::Custom(check) => check.has_rule(),
            _ => true,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Boolean => f.write_str("boolean"),
            ScalarKind::Integer => f.write_str("integer"),
            ScalarKind::Float => f.write_str("float"),
            ScalarKind::Text => f.write_str("text"),
            ScalarKind::Custom(check) => f.write_str(check.name()),
        }
    }
}

// ─────────────────────────────── Target shapes ───────────────────────────────

/// A resolved target shape: what a dynamic value is decoded *into*.
///
/// The union is closed. Anything not expressible here was already rejected
/// as a [`SchemaError`] during resolution, so the decode engine is total
/// over `Shape`.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A scalar of the given classification.
    Scalar(ScalarKind),
    /// A named structure with typed fields.
    Struct(Arc<StructShape>),
    /// A homogeneous ordered collection of the element shape.
    Sequence(Box<Shape>),
}

impl Shape {
    /// The registry identity of this shape, when it has one.
    ///
    /// Structures are identified by their name and custom scalar checks by
    /// the check name. Built-in scalars and sequences carry no identity and
    /// cannot be bound to a custom decoder.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Shape::Struct(def) => Some(def.name()),
            Shape::Scalar(ScalarKind::Custom(check)) => Some(check.name()),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => write!(f, "{kind}"),
            Shape::Struct(def) => write!(f, "struct {}", def.name()),
            Shape::Sequence(element) => write!(f, "sequence<{element}>"),
        }
    }
}

// ─────────────────────────── Declaration expressions ──────────────────────────

/// A schema-level type declaration, as authored.
///
/// Declarations are resolved into [`Shape`]s before any decoding happens.
/// The union deliberately includes declarations the engine refuses to
/// serve, so that refusal is an explicit, tested resolution outcome rather
/// than a decode-time surprise:
///
/// - [`TypeExpr::BareSequence`] (an unparameterized abstract sequence) and
///   [`TypeExpr::InitOnly`] (a construction-lifecycle marker with no
///   runtime value) are schema-authoring errors, `NotAllowedType`.
/// - [`TypeExpr::Set`], [`TypeExpr::Mapping`], [`TypeExpr::Optional`] and
///   [`TypeExpr::Tuple`] are recognized container declarations with no
///   decode support, `NotSupportedType`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Boolean scalar.
    Boolean,
    /// Integer scalar.
    Integer,
    /// Float scalar.
    Float,
    /// Text scalar.
    Text,
    /// Arbitrary concrete type check, or an opaque registry-only target.
    Custom(ScalarCheck),
    /// A nested structure, already built.
    Struct(Arc<StructShape>),
    /// A homogeneous sequence of the element declaration.
    Sequence(Box<TypeExpr>),
    /// An unparameterized sequence. Not allowed in a decode schema.
    BareSequence,
    /// A construction-only marker with no runtime value. Not allowed.
    InitOnly,
    /// A set of the element declaration. Not supported by the engine.
    Set(Box<TypeExpr>),
    /// A key/value mapping declaration. Not supported by the engine.
    Mapping(Box<TypeExpr>, Box<TypeExpr>),
    /// An optional of the element declaration. Not supported by the engine.
    Optional(Box<TypeExpr>),
    /// A heterogeneous tuple declaration. Not supported by the engine.
    Tuple(Vec<TypeExpr>),
}

impl TypeExpr {
    /// Resolve this declaration into a [`Shape`].
    ///
    /// `at` names the declaration site (for a structure field,
    /// `"{struct}.{field}"`) and is carried in any resulting error.
    ///
    /// # Errors
    ///
    /// `SchemaError::NotAllowedType` for declarations that are illegal in a
    /// decode schema, and `SchemaError::NotSupportedType` for container
    /// declarations the engine has no decode rule for. Both are raised
    /// here, at schema-build time, never during a decode.
    pub fn resolve(&self, at: &str) -> Result<Shape, SchemaError> {
        match self {
            TypeExpr::Boolean => Ok(Shape::Scalar(ScalarKind::Boolean)),
            TypeExpr::Integer => Ok(Shape::Scalar(ScalarKind::Integer)),
            TypeExpr::Float => Ok(Shape::Scalar(ScalarKind::Float)),
            TypeExpr::Text => Ok(Shape::Scalar(ScalarKind::Text)),
            TypeExpr::Custom(check) => Ok(Shape::Scalar(ScalarKind::Custom(*check))),
            TypeExpr::Struct(def) => Ok(Shape::Struct(Arc::clone(def))),
            TypeExpr::Sequence(element) => {
                Ok(Shape::Sequence(Box::new(element.resolve(at)?)))
            }
            TypeExpr::BareSequence | TypeExpr::InitOnly => {
                Err(SchemaError::NotAllowedType {
                    target: self.to_string(),
                    path: at.to_string(),
                })
            }
            TypeExpr::Set(_)
            | TypeExpr::Mapping(_, _)
            | TypeExpr::Optional(_)
            | TypeExpr::Tuple(_) => Err(SchemaError::NotSupportedType {
                target: self.to_string(),
                path: at.to_string(),
            }),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Boolean => f.write_str("boolean"),
            TypeExpr::Integer => f.write_str("integer"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Text => f.write_str("text"),
            TypeExpr::Custom(check) => f.write_str(check.name()),
            TypeExpr::Struct(def) => write!(f, "struct {}", def.name()),
            TypeExpr::Sequence(element) => write!(f, "sequence<{element}>"),
            TypeExpr::BareSequence => f.write_str("sequence"),
            TypeExpr::InitOnly => f.write_str("init-only"),
            TypeExpr::Set(element) => write!(f, "set<{element}>"),
            TypeExpr::Mapping(key, value) => write!(f, "mapping<{key}, {value}>"),
            TypeExpr::Optional(element) => write!(f, "optional<{element}>"),
            TypeExpr::Tuple(items) => {
                f.write_str("tuple<")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(">")
            }
        }
    }
}

// ──────────────────────────── Structure descriptors ───────────────────────────

/// Default for an optional structure field.
///
/// Either a fixed dynamic value or a producer invoked per decode (the
/// fresh-container case: a producer returning `[]` gives every decoded
/// structure its own sequence).
#[derive(Clone, PartialEq)]
pub enum FieldDefault {
    /// A fixed default value.
    Value(Value),
    /// A rule producing the default value on demand.
    Producer(fn() -> Value),
}

impl FieldDefault {
    /// Produce the default dynamic value.
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// A single declared field of a structure: name, resolved shape, and an
/// optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    shape: Shape,
    default: Option<FieldDefault>,
}

impl FieldSpec {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's resolved target shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The field's declared default, if any.
    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// A field is required exactly when it declares no default.
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// A named structure descriptor: an ordered list of typed fields.
///
/// Built through [`StructShape::builder`], which resolves every field
/// declaration and rejects illegal ones. The field list is immutable after
/// `build()`; the derived [`StructProfile`] is memoized in the descriptor
/// on first use (see the `profile` module).
pub struct StructShape {
    name: String,
    fields: Vec<FieldSpec>,
    pub(crate) profile: OnceLock<StructProfile>,
}

impl StructShape {
    /// Start declaring a structure with the given name.
    ///
    /// The name is the structure's identity: it names the constructed value
    /// and keys any custom decoder registered for this structure.
    pub fn builder(name: impl Into<String>) -> StructBuilder {
        StructBuilder { name: name.into(), fields: Vec::new() }
    }

    /// The structure's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

impl fmt::Debug for StructShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructShape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

// The memoized profile is derived state and does not participate in
// structural equality.
impl PartialEq for StructShape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// Builder for [`StructShape`]. Field declarations are resolved and checked
/// at [`StructBuilder::build`].
pub struct StructBuilder {
    name: String,
    fields: Vec<(String, TypeExpr, Option<FieldDefault>)>,
}

impl StructBuilder {
    /// Declare a required field.
    pub fn field(mut self, name: impl Into<String>, expr: TypeExpr) -> Self {
        self.fields.push((name.into(), expr, None));
        self
    }

    /// Declare an optional field with a fixed default value.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        expr: TypeExpr,
        default: Value,
    ) -> Self {
        self.fields.push((name.into(), expr, Some(FieldDefault::Value(default))));
        self
    }

    /// Declare an optional field with a default-producing rule.
    pub fn field_with_producer(
        mut self,
        name: impl Into<String>,
        expr: TypeExpr,
        producer: fn() -> Value,
    ) -> Self {
        self.fields.push((name.into(), expr, Some(FieldDefault::Producer(producer))));
        self
    }

    /// Resolve every field declaration and freeze the structure.
    ///
    /// # Errors
    ///
    /// `SchemaError::DuplicateField` if two fields share a name, plus any
    /// resolution error from the field declarations themselves.
    pub fn build(self) -> Result<Arc<StructShape>, SchemaError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());

        for (name, expr, default) in self.fields {
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateField { name, path: self.name });
            }
            let at = format!("{}.{name}", self.name);
            let shape = expr.resolve(&at)?;
            fields.push(FieldSpec { name, shape, default });
        }

        Ok(Arc::new(StructShape {
            name: self.name,
            fields,
            profile: OnceLock::new(),
        }))
    }
}
