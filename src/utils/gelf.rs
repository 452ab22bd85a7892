//! GELF log shipping
//!
//! A tracing layer that forwards every event as an uncompressed GELF 1.1
//! message in a single UDP datagram. Delivery is best effort.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::net::UdpSocket;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One GELF 1.1 message
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GelfMessage {
    pub version: &'static str,
    pub host: String,
    pub short_message: String,
    /// Seconds since the epoch with millisecond precision
    pub timestamp: f64,
    /// Syslog severity
    pub level: u8,
    /// Additional fields, keys already `_`-prefixed
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl GelfMessage {
    pub fn new(
        host: impl Into<String>,
        level: &Level,
        short_message: impl Into<String>,
        fields: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            version: "1.1",
            host: host.into(),
            short_message: short_message.into(),
            timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
            level: syslog_level(level),
            fields,
        }
    }
}

/// Map tracing levels onto syslog severities
pub fn syslog_level(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        _ => 7,
    }
}

/// Additional field name; GELF reserves `_id`
fn field_key(name: &str) -> String {
    if name == "id" {
        "_event_id".to_string()
    } else {
        format!("_{name}")
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: BTreeMap<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field_key(field.name()), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.insert(field, Value::String(format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

/// Name of this machine, as reported in the GELF `host` field
fn local_hostname() -> String {
    let name = gethostname::gethostname().to_string_lossy().into_owned();
    if name.is_empty() {
        "test-otp".to_string()
    } else {
        name
    }
}

/// Tracing layer sending events to a GELF UDP input
pub struct GelfLayer {
    socket: UdpSocket,
    host: String,
}

impl GelfLayer {
    /// Connect to a GELF UDP endpoint (`host:port`)
    pub fn connect(endpoint: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(endpoint)?;
        Ok(Self {
            socket,
            host: local_hostname(),
        })
    }

    fn message(&self, event: &Event<'_>) -> GelfMessage {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        visitor
            .fields
            .insert("_target".to_string(), Value::from(metadata.target()));

        GelfMessage::new(
            self.host.clone(),
            metadata.level(),
            visitor.message.unwrap_or_default(),
            visitor.fields,
        )
    }
}

impl<S: Subscriber> Layer<S> for GelfLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Ok(payload) = serde_json::to_vec(&self.message(event)) {
            let _ = self.socket.send(&payload);
        }
    }
}
