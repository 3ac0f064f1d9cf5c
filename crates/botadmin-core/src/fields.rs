//! Field descriptors and value maps for the tenant creation form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every value the tenant form carries, including the two identity fields
/// that live outside the declarative field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    Name,
    WhatsappNumber,
    BusinessName,
    Email,
    Password,
    WhatsappApiToken,
    WhatsappBusinessId,
    WhatsappPhoneNumber,
    WhatsappPhoneId,
    OpenaiApi,
    RetrievalToolName,
    RetrievalToolDescription,
    Prompt,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::WhatsappNumber => "whatsappNumber",
            FieldKey::BusinessName => "businessName",
            FieldKey::Email => "email",
            FieldKey::Password => "password",
            FieldKey::WhatsappApiToken => "whatsappAPIToken",
            FieldKey::WhatsappBusinessId => "whatsappBusinessId",
            FieldKey::WhatsappPhoneNumber => "whatsappPhoneNumber",
            FieldKey::WhatsappPhoneId => "whatsappPhoneId",
            FieldKey::OpenaiApi => "openaiAPI",
            FieldKey::RetrievalToolName => "retrievalToolName",
            FieldKey::RetrievalToolDescription => "retrievalToolDescription",
            FieldKey::Prompt => "prompt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|key| key.as_str() == s)
    }

    pub fn all() -> Vec<FieldKey> {
        vec![
            FieldKey::Name,
            FieldKey::WhatsappNumber,
            FieldKey::BusinessName,
            FieldKey::Email,
            FieldKey::Password,
            FieldKey::WhatsappApiToken,
            FieldKey::WhatsappBusinessId,
            FieldKey::WhatsappPhoneNumber,
            FieldKey::WhatsappPhoneId,
            FieldKey::OpenaiApi,
            FieldKey::RetrievalToolName,
            FieldKey::RetrievalToolDescription,
            FieldKey::Prompt,
        ]
    }

    /// Values that should never be echoed back in plain text.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            FieldKey::Password | FieldKey::WhatsappApiToken | FieldKey::OpenaiApi
        )
    }
}

/// Declarative description of one form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: FieldKey,
    pub label: &'static str,
    pub placeholder: &'static str,
}

impl FormField {
    /// The prompt always renders as a multi-line control outside the grid.
    pub fn is_prompt(&self) -> bool {
        self.key == FieldKey::Prompt
    }
}

/// The declared fields, in display order.
pub static FORM_FIELDS: [FormField; 11] = [
    FormField {
        key: FieldKey::BusinessName,
        label: "Business Name",
        placeholder: "User full name",
    },
    FormField {
        key: FieldKey::Email,
        label: "Email",
        placeholder: "User email",
    },
    FormField {
        key: FieldKey::Password,
        label: "Password",
        placeholder: "User password",
    },
    FormField {
        key: FieldKey::WhatsappApiToken,
        label: "Whatsapp API Token",
        placeholder: "EAAOVZXXX...",
    },
    FormField {
        key: FieldKey::WhatsappBusinessId,
        label: "Whatsapp Business ID",
        placeholder: "363XXX...",
    },
    FormField {
        key: FieldKey::WhatsappPhoneNumber,
        label: "Whatsapp Phone Number",
        placeholder: "21378XXX...",
    },
    FormField {
        key: FieldKey::WhatsappPhoneId,
        label: "Whatsapp Phone ID",
        placeholder: "740XXX...",
    },
    FormField {
        key: FieldKey::OpenaiApi,
        label: "OpenAI API",
        placeholder: "sk-svXXX ...",
    },
    FormField {
        key: FieldKey::RetrievalToolName,
        label: "Retrieval Tool Name",
        placeholder: "French Cheese",
    },
    FormField {
        key: FieldKey::RetrievalToolDescription,
        label: "Retrieval Tool Description",
        placeholder: "An E-commerce website that ...",
    },
    FormField {
        key: FieldKey::Prompt,
        label: "Prompt",
        placeholder: "Act as a customer service agent for a French Cheese E-commerce website ...",
    },
];

/// Identity inputs rendered ahead of the grid.
pub static IDENTITY_FIELDS: [FormField; 2] = [
    FormField {
        key: FieldKey::Name,
        label: "Name",
        placeholder: "Tenant contact name",
    },
    FormField {
        key: FieldKey::WhatsappNumber,
        label: "WhatsApp Number",
        placeholder: "+14155551234",
    },
];

pub fn prompt_field() -> &'static FormField {
    &FORM_FIELDS[FORM_FIELDS.len() - 1]
}

/// Declared fields that belong to the fixed grid (everything but the prompt).
pub fn grid_fields() -> impl Iterator<Item = &'static FormField> {
    FORM_FIELDS.iter().filter(|field| !field.is_prompt())
}

/// Descriptor for any key, identity fields included.
pub fn field_for(key: FieldKey) -> &'static FormField {
    IDENTITY_FIELDS
        .iter()
        .chain(FORM_FIELDS.iter())
        .find(|field| field.key == key)
        .unwrap_or(&IDENTITY_FIELDS[0])
}

/// Current string value of every form key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    values: BTreeMap<FieldKey, String>,
}

impl FormData {
    pub fn new() -> Self {
        let values = FieldKey::all()
            .into_iter()
            .map(|key| (key, String::new()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    pub fn is_blank(&self, key: FieldKey) -> bool {
        self.get(key).trim().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-field validation messages. A key is present only while it fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    messages: BTreeMap<FieldKey, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.messages.insert(key, message.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.messages.get(&key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.messages.contains_key(&key)
    }

    /// Drops a single field's message, returning whether one was present.
    pub fn clear_field(&mut self, key: FieldKey) -> bool {
        self.messages.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.messages.iter().map(|(key, msg)| (*key, msg.as_str()))
    }
}
