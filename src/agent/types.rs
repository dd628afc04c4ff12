//! Wire types shared by the client, the proxy routes and the remote agent

use serde::{Deserialize, Serialize};

/// Reply used when the agent produced no readable turn
pub const FALLBACK_REPLY_TEXT: &str = "Sorry, no text response found.";

/// A previous purchase made by the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub product_id: String,
    pub label: String,
    pub quantity: u32,
    pub purchase_date: String,
    pub eur_regular_price: f64,
    #[serde(default)]
    pub review_left: bool,
}

/// A product currently in the customer's basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub product_id: String,
    pub label: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Initial session state handed to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerState {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub preferred_language: String,
    pub loyalty_status: String,
    #[serde(default)]
    pub purchase_history: Vec<Purchase>,
    #[serde(default)]
    pub basket: Vec<BasketItem>,
}

impl CustomerState {
    /// Merge caller-supplied fields over the defaults.
    ///
    /// Empty strings count as absent, so `first_name: Some("")` still yields
    /// `"User"`.
    pub fn from_partial(customer_id: impl Into<String>, data: CustomerData) -> Self {
        fn or(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            customer_id: customer_id.into(),
            first_name: or(data.first_name, "User"),
            last_name: or(data.last_name, ""),
            email: or(data.email, ""),
            preferred_language: or(data.preferred_language, "fr"),
            loyalty_status: or(data.loyalty_status, "Standard"),
            purchase_history: data.purchase_history.unwrap_or_default(),
            basket: data.basket.unwrap_or_default(),
        }
    }
}

/// Partial customer data supplied by the caller at session creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub preferred_language: Option<String>,
    pub loyalty_status: Option<String>,
    pub purchase_history: Option<Vec<Purchase>>,
    pub basket: Option<Vec<BasketItem>>,
}

/// Base64 payload with its MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One unit of message content: `{"text": ..}` or `{"inline_data": {..}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePart {
    Text(String),
    InlineData(InlineData),
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        })
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::InlineData(_) => None,
        }
    }
}

/// The user turn inside an outgoing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: String,
    pub parts: Vec<MessagePart>,
}

/// Run request built by the client; the proxy forwards it verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub app_name: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub new_message: NewMessage,
    #[serde(default)]
    pub streaming: bool,
}

impl OutgoingMessage {
    /// Build a non-streaming user message
    pub fn user(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        parts: Vec<MessagePart>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: Some(session_id.into()),
            new_message: NewMessage {
                role: "user".to_string(),
                parts,
            },
            streaming: false,
        }
    }
}

/// Body the client sends to the create-session proxy route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub session_id: String,
    pub state: CustomerState,
}

/// One agent turn as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContent {
    pub role: String,
    pub parts: Vec<MessagePart>,
}

impl AgentContent {
    /// The canned reply used when the agent said nothing readable
    pub fn fallback() -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![MessagePart::text(FALLBACK_REPLY_TEXT)],
        }
    }

    /// All text parts joined with newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(MessagePart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of a session operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionEnvelope {
    pub fn ok(session_id: impl Into<String>) -> Self {
        Self {
            success: true,
            session_id: Some(session_id.into()),
            error: None,
        }
    }

    /// Success reported by the agent without a session id
    pub fn without_id() -> Self {
        Self {
            success: true,
            session_id: None,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a message operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AgentContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageEnvelope {
    pub fn ok(response: AgentContent) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}
