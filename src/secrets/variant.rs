//! Credential descriptor variants
//!
//! One struct per external-system type, a closed [`Descriptor`] union over
//! them, and the [`VARIANTS`] table mapping each `type` tag to its field set,
//! constraints and constructor.
//!
//! # Adding a variant
//! 1. Define the struct and implement [`Variant`] for it (fields, constraints,
//!    rendered parameters).
//! 2. Add a `Descriptor` case and a row in [`VARIANTS`].
//!
//! Nothing else (parser, renderer, binder) changes.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::constraint::{AuthMode, Constraint, Trigger};
use super::field::{check_fields, DefaultValue, FieldSpec, FieldType};
use super::sensitive::Sensitive;
use super::statement::{ConnPart, ParamWriter};
use crate::error::{FieldError, FieldErrorKind};

/// A credential variant: its tag, declared fields and rendered parameters
pub trait Variant: DeserializeOwned + Into<Descriptor> {
    /// `type` tag in the secrets document and `TYPE` in the statement
    const TAG: &'static str;
    const FIELDS: &'static [FieldSpec];
    const CONSTRAINTS: &'static [Constraint] = &[];

    /// Emit `KEY value` parameters after `TYPE`, in the engine's order
    fn write_params(&self, w: &mut ParamWriter);
}

// ============================================================================
// Relational databases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresSecret {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Sensitive<String>,
    pub database: String,
    pub schema: String,
}

impl Variant for PostgresSecret {
    const TAG: &'static str = "postgres";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("host", FieldType::String),
        FieldSpec::defaulted("port", FieldType::Port, DefaultValue::Port(5432)),
        FieldSpec::required("user", FieldType::String),
        FieldSpec::required("password", FieldType::String).sensitive(),
        FieldSpec::required("database", FieldType::String),
        FieldSpec::defaulted("schema", FieldType::String, DefaultValue::String("public")),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        let port = self.port.to_string();
        w.connection_string(
            "CONNECTION_STRING",
            &[
                ("host", ConnPart::Plain(&self.host)),
                ("port", ConnPart::Plain(&port)),
                ("user", ConnPart::Plain(&self.user)),
                ("password", ConnPart::Secret(self.password.expose())),
                ("dbname", ConnPart::Plain(&self.database)),
            ],
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlSecret {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Sensitive<String>,
    pub database: String,
}

impl Variant for MySqlSecret {
    const TAG: &'static str = "mysql";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("host", FieldType::String),
        FieldSpec::defaulted("port", FieldType::Port, DefaultValue::Port(3306)),
        FieldSpec::required("user", FieldType::String),
        FieldSpec::required("password", FieldType::String).sensitive(),
        FieldSpec::required("database", FieldType::String),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        let port = self.port.to_string();
        w.connection_string(
            "CONNECTION_STRING",
            &[
                ("host", ConnPart::Plain(&self.host)),
                ("port", ConnPart::Plain(&port)),
                ("user", ConnPart::Plain(&self.user)),
                ("password", ConnPart::Secret(self.password.expose())),
                ("database", ConnPart::Plain(&self.database)),
            ],
        );
    }
}

// ============================================================================
// Object storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Secret {
    pub key_id: String,
    pub secret: Sensitive<String>,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub use_ssl: bool,
}

impl Variant for S3Secret {
    const TAG: &'static str = "s3";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("key_id", FieldType::String),
        FieldSpec::required("secret", FieldType::String).sensitive(),
        FieldSpec::required("region", FieldType::String),
        FieldSpec::optional("scope", FieldType::String),
        FieldSpec::optional("endpoint", FieldType::String),
        FieldSpec::defaulted("use_ssl", FieldType::Boolean, DefaultValue::Boolean(true)),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        w.string("KEY_ID", &self.key_id);
        w.secret("SECRET", self.secret.expose());
        w.string("REGION", &self.region);
        w.opt_string("ENDPOINT", self.endpoint.as_deref());
        if !self.use_ssl {
            w.boolean("USE_SSL", false);
        }
        w.opt_string("SCOPE", self.scope.as_deref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcsSecret {
    pub key_id: String,
    pub secret: Sensitive<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Variant for GcsSecret {
    const TAG: &'static str = "gcs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("key_id", FieldType::String),
        FieldSpec::required("secret", FieldType::String).sensitive(),
        FieldSpec::optional("region", FieldType::String),
        FieldSpec::optional("scope", FieldType::String),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        w.string("KEY_ID", &self.key_id);
        w.secret("SECRET", self.secret.expose());
        w.opt_string("REGION", self.region.as_deref());
        w.opt_string("SCOPE", self.scope.as_deref());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AzureProvider {
    Config,
    CredentialChain,
    ServicePrincipal,
    ManagedIdentity,
}

impl AzureProvider {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::CredentialChain => "credential_chain",
            Self::ServicePrincipal => "service_principal",
            Self::ManagedIdentity => "managed_identity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AzureProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_key: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

const AZURE_PROVIDERS: &[&str] = &[
    "config",
    "credential_chain",
    "service_principal",
    "managed_identity",
];

const AZURE_AUTH_MODES: &[AuthMode] = &[
    AuthMode {
        name: "shared_key",
        triggers: &[Trigger::Present("account_key")],
        requires: &["account_name"],
        requires_any: &[],
    },
    AuthMode {
        name: "connection_string",
        triggers: &[Trigger::Present("connection_string")],
        requires: &[],
        requires_any: &[],
    },
    AuthMode {
        name: "service_principal",
        triggers: &[
            Trigger::Present("tenant_id"),
            Trigger::Present("client_secret"),
            Trigger::Present("client_certificate_path"),
            Trigger::Equals("provider", "service_principal"),
        ],
        requires: &["tenant_id", "client_id"],
        requires_any: &["client_secret", "client_certificate_path"],
    },
    AuthMode {
        name: "managed_identity",
        triggers: &[Trigger::Equals("provider", "managed_identity")],
        requires: &[],
        requires_any: &[],
    },
    AuthMode {
        name: "credential_chain",
        triggers: &[
            Trigger::Equals("provider", "credential_chain"),
            Trigger::Present("chain"),
        ],
        requires: &[],
        requires_any: &[],
    },
];

impl Variant for AzureSecret {
    const TAG: &'static str = "azure";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("provider", FieldType::Keyword(AZURE_PROVIDERS)),
        FieldSpec::optional("account_name", FieldType::String),
        FieldSpec::optional("account_key", FieldType::String).sensitive(),
        FieldSpec::optional("connection_string", FieldType::String).sensitive(),
        FieldSpec::optional("tenant_id", FieldType::String),
        FieldSpec::optional("client_id", FieldType::String),
        FieldSpec::optional("client_secret", FieldType::String).sensitive(),
        FieldSpec::optional("client_certificate_path", FieldType::String),
        FieldSpec::optional("chain", FieldType::String),
    ];
    const CONSTRAINTS: &'static [Constraint] = &[Constraint::ExactlyOneMode(AZURE_AUTH_MODES)];

    fn write_params(&self, w: &mut ParamWriter) {
        if let Some(provider) = self.provider {
            w.keyword("PROVIDER", provider.as_str());
        }
        w.opt_string("ACCOUNT_NAME", self.account_name.as_deref());
        w.opt_secret("ACCOUNT_KEY", exposed(&self.account_key));
        w.opt_secret("CONNECTION_STRING", exposed(&self.connection_string));
        w.opt_string("TENANT_ID", self.tenant_id.as_deref());
        w.opt_string("CLIENT_ID", self.client_id.as_deref());
        w.opt_secret("CLIENT_SECRET", exposed(&self.client_secret));
        w.opt_string(
            "CLIENT_CERTIFICATE_PATH",
            self.client_certificate_path.as_deref(),
        );
        w.opt_string("CHAIN", self.chain.as_deref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct R2Secret {
    pub key_id: String,
    pub secret: Sensitive<String>,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Variant for R2Secret {
    const TAG: &'static str = "r2";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("key_id", FieldType::String),
        FieldSpec::required("secret", FieldType::String).sensitive(),
        FieldSpec::required("account_id", FieldType::String),
        FieldSpec::optional("region", FieldType::String),
        FieldSpec::optional("scope", FieldType::String),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        w.string("KEY_ID", &self.key_id);
        w.secret("SECRET", self.secret.expose());
        w.string("ACCOUNT_ID", &self.account_id);
        w.opt_string("REGION", self.region.as_deref());
        w.opt_string("SCOPE", self.scope.as_deref());
    }
}

// ============================================================================
// HTTP endpoints and catalogs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_http_headers: Option<Sensitive<IndexMap<String, String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy_password: Option<Sensitive<String>>,
}

impl Variant for HttpSecret {
    const TAG: &'static str = "http";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("bearer_token", FieldType::String).sensitive(),
        FieldSpec::optional("extra_http_headers", FieldType::StringMap).sensitive(),
        FieldSpec::optional("http_proxy", FieldType::String),
        FieldSpec::optional("http_proxy_username", FieldType::String),
        FieldSpec::optional("http_proxy_password", FieldType::String).sensitive(),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        w.opt_secret("BEARER_TOKEN", exposed(&self.bearer_token));
        if let Some(headers) = &self.extra_http_headers {
            w.secret_map("EXTRA_HTTP_HEADERS", headers.expose());
        }
        w.opt_string("HTTP_PROXY", self.http_proxy.as_deref());
        w.opt_string("HTTP_PROXY_USERNAME", self.http_proxy_username.as_deref());
        w.opt_secret("HTTP_PROXY_PASSWORD", exposed(&self.http_proxy_password));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcebergSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2_server_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2_scope: Option<String>,
}

const ICEBERG_AUTH_MODES: &[AuthMode] = &[
    AuthMode {
        name: "token",
        triggers: &[Trigger::Present("token")],
        requires: &[],
        requires_any: &[],
    },
    AuthMode {
        name: "oauth2",
        triggers: &[
            Trigger::Present("client_id"),
            Trigger::Present("client_secret"),
            Trigger::Present("oauth2_server_uri"),
            Trigger::Present("oauth2_scope"),
        ],
        requires: &["client_id", "client_secret", "oauth2_server_uri"],
        requires_any: &[],
    },
];

impl Variant for IcebergSecret {
    const TAG: &'static str = "iceberg";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("token", FieldType::String).sensitive(),
        FieldSpec::optional("client_id", FieldType::String),
        FieldSpec::optional("client_secret", FieldType::String).sensitive(),
        FieldSpec::optional("oauth2_server_uri", FieldType::String),
        FieldSpec::optional("oauth2_scope", FieldType::String),
    ];
    const CONSTRAINTS: &'static [Constraint] = &[Constraint::AtMostOneMode(ICEBERG_AUTH_MODES)];

    fn write_params(&self, w: &mut ParamWriter) {
        w.opt_secret("TOKEN", exposed(&self.token));
        w.opt_string("CLIENT_ID", self.client_id.as_deref());
        w.opt_secret("CLIENT_SECRET", exposed(&self.client_secret));
        w.opt_string("OAUTH2_SERVER_URI", self.oauth2_server_uri.as_deref());
        w.opt_string("OAUTH2_SCOPE", self.oauth2_scope.as_deref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuckLakeSecret {
    pub metadata_path: String,
    pub data_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_parameters: Option<Sensitive<IndexMap<String, String>>>,
}

impl Variant for DuckLakeSecret {
    const TAG: &'static str = "ducklake";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("metadata_path", FieldType::String),
        FieldSpec::required("data_path", FieldType::String),
        FieldSpec::optional("metadata_parameters", FieldType::StringMap).sensitive(),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        w.string("METADATA_PATH", &self.metadata_path);
        w.string("DATA_PATH", &self.data_path);
        if let Some(params) = &self.metadata_parameters {
            w.secret_map("METADATA_PARAMETERS", params.expose());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuggingFaceProvider {
    Config,
    CredentialChain,
}

impl HuggingFaceProvider {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::CredentialChain => "credential_chain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuggingFaceSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<HuggingFaceProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Sensitive<String>>,
}

const HUGGINGFACE_PROVIDERS: &[&str] = &["config", "credential_chain"];

impl Variant for HuggingFaceSecret {
    const TAG: &'static str = "huggingface";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("provider", FieldType::Keyword(HUGGINGFACE_PROVIDERS)),
        FieldSpec::optional("token", FieldType::String).sensitive(),
    ];

    fn write_params(&self, w: &mut ParamWriter) {
        if let Some(provider) = self.provider {
            w.keyword("PROVIDER", provider.as_str());
        }
        w.opt_secret("TOKEN", exposed(&self.token));
    }
}

// ============================================================================
// Descriptor union and registry
// ============================================================================

/// A validated credential, one case per supported external system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Descriptor {
    Postgres(PostgresSecret),
    MySql(MySqlSecret),
    S3(S3Secret),
    Gcs(GcsSecret),
    Azure(AzureSecret),
    R2(R2Secret),
    Http(HttpSecret),
    Iceberg(IcebergSecret),
    DuckLake(DuckLakeSecret),
    HuggingFace(HuggingFaceSecret),
}

macro_rules! descriptor_from {
    ($($case:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Descriptor {
                fn from(secret: $ty) -> Self {
                    Self::$case(secret)
                }
            }
        )*
    };
}

descriptor_from! {
    Postgres => PostgresSecret,
    MySql => MySqlSecret,
    S3 => S3Secret,
    Gcs => GcsSecret,
    Azure => AzureSecret,
    R2 => R2Secret,
    Http => HttpSecret,
    Iceberg => IcebergSecret,
    DuckLake => DuckLakeSecret,
    HuggingFace => HuggingFaceSecret,
}

impl Descriptor {
    /// The variant's `type` tag
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => PostgresSecret::TAG,
            Self::MySql(_) => MySqlSecret::TAG,
            Self::S3(_) => S3Secret::TAG,
            Self::Gcs(_) => GcsSecret::TAG,
            Self::Azure(_) => AzureSecret::TAG,
            Self::R2(_) => R2Secret::TAG,
            Self::Http(_) => HttpSecret::TAG,
            Self::Iceberg(_) => IcebergSecret::TAG,
            Self::DuckLake(_) => DuckLakeSecret::TAG,
            Self::HuggingFace(_) => HuggingFaceSecret::TAG,
        }
    }

    pub(crate) fn write_params(&self, w: &mut ParamWriter) {
        match self {
            Self::Postgres(s) => s.write_params(w),
            Self::MySql(s) => s.write_params(w),
            Self::S3(s) => s.write_params(w),
            Self::Gcs(s) => s.write_params(w),
            Self::Azure(s) => s.write_params(w),
            Self::R2(s) => s.write_params(w),
            Self::Http(s) => s.write_params(w),
            Self::Iceberg(s) => s.write_params(w),
            Self::DuckLake(s) => s.write_params(w),
            Self::HuggingFace(s) => s.write_params(w),
        }
    }

    /// Declared fields of this descriptor's variant
    #[must_use]
    pub fn field_specs(&self) -> &'static [FieldSpec] {
        match lookup(self.kind()) {
            Some(def) => def.fields,
            None => &[],
        }
    }

    /// Fields as a JSON object, `type` excluded and unset options omitted
    #[must_use]
    pub fn connection_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        // Serializing these structs cannot fail: every key is a string.
        let mut fields = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        fields.remove("type");
        fields
    }

    /// Every credential value held by this descriptor
    ///
    /// Used to scrub engine error messages; map-typed sensitive fields
    /// contribute each of their values.
    #[must_use]
    pub fn sensitive_values(&self) -> Vec<String> {
        let fields = self.connection_fields();
        let mut values = Vec::new();
        for spec in self.field_specs().iter().filter(|s| s.sensitive) {
            match fields.get(spec.name) {
                Some(serde_json::Value::String(s)) => values.push(s.clone()),
                Some(serde_json::Value::Object(map)) => {
                    values.extend(map.values().filter_map(|v| v.as_str().map(str::to_string)));
                }
                _ => {}
            }
        }
        values
    }
}

/// Table row binding a tag to its field set, constraints and constructor
#[derive(Debug, Clone, Copy)]
pub struct VariantDef {
    pub tag: &'static str,
    pub fields: &'static [FieldSpec],
    pub constraints: &'static [Constraint],
    build: fn(Mapping) -> Result<Descriptor, serde_yaml::Error>,
}

impl VariantDef {
    const fn of<V: Variant>() -> Self {
        Self {
            tag: V::TAG,
            fields: V::FIELDS,
            constraints: V::CONSTRAINTS,
            build: build::<V>,
        }
    }

    /// Validate one raw entry (`type` already removed)
    ///
    /// All-or-nothing: either a descriptor or every problem found in the entry.
    pub fn validate(&self, raw: &Mapping, path: &str) -> Result<Descriptor, Vec<FieldError>> {
        let mut errors = Vec::new();
        let Some(fields) = check_fields(self.tag, self.fields, raw, path, &mut errors) else {
            return Err(errors);
        };

        for constraint in self.constraints {
            for violation in constraint.violations(&fields) {
                errors.push(FieldError::new(
                    path,
                    FieldErrorKind::ConstraintViolation {
                        variant: self.tag.to_string(),
                        constraint: violation,
                    },
                ));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        // The serde error may quote a value, so it is not passed on.
        (self.build)(fields).map_err(|_| {
            vec![FieldError::new(
                path,
                FieldErrorKind::ConstraintViolation {
                    variant: self.tag.to_string(),
                    constraint: "validated fields do not form a valid entry".to_string(),
                },
            )]
        })
    }
}

fn exposed(value: &Option<Sensitive<String>>) -> Option<&str> {
    value.as_ref().map(|s| s.expose().as_str())
}

fn build<V: Variant>(fields: Mapping) -> Result<Descriptor, serde_yaml::Error> {
    serde_yaml::from_value::<V>(Value::Mapping(fields)).map(Into::into)
}

/// Every supported variant, looked up by tag
pub static VARIANTS: &[VariantDef] = &[
    VariantDef::of::<PostgresSecret>(),
    VariantDef::of::<MySqlSecret>(),
    VariantDef::of::<S3Secret>(),
    VariantDef::of::<GcsSecret>(),
    VariantDef::of::<AzureSecret>(),
    VariantDef::of::<R2Secret>(),
    VariantDef::of::<HttpSecret>(),
    VariantDef::of::<IcebergSecret>(),
    VariantDef::of::<DuckLakeSecret>(),
    VariantDef::of::<HuggingFaceSecret>(),
];

/// Find the variant for a `type` tag
#[must_use]
pub fn lookup(tag: &str) -> Option<&'static VariantDef> {
    VARIANTS.iter().find(|def| def.tag == tag)
}
