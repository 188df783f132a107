//! User record types and the store line format
//!
//! One record per line, four `;`-separated fields in fixed order:
//!
//! ```text
//! id;name;email;status
//! ```
//!
//! There is no header and no escaping. A field containing `;` or a line
//! break produces a row that will not read back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field separator within a line
pub const FIELD_SEPARATOR: char = ';';

/// Identifier of a user, derived from the email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an id read back from the store file.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the id for an email address.
    ///
    /// The id is the 32-bit polynomial string hash (`h = 31 * h + unit`
    /// over UTF-16 code units, wrapping) printed as a signed decimal.
    /// Existing store files were keyed this way, so the derivation must not
    /// change. It is not collision resistant: two emails may share an id,
    /// and nothing detects that.
    pub fn from_email(email: &str) -> Self {
        let hash = email
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(hash.to_string())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invite status of a user.
///
/// Two values are known; anything else found in the file is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Invite not sent yet (the default for new users)
    #[default]
    SendInvite,
    /// Invite has been sent
    InviteSent,
    /// Any other value
    Other(String),
}

impl Status {
    /// Returns the exact text stored in the file
    pub fn as_str(&self) -> &str {
        match self {
            Status::SendInvite => "ENVIAR CONVITE",
            Status::InviteSent => "CONVITE ENVIADO",
            Status::Other(s) => s,
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "ENVIAR CONVITE" => Status::SendInvite,
            "CONVITE ENVIADO" => Status::InviteSent,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from(s.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored user entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: Status,
}

impl User {
    /// Builds a new user, deriving the id from the email.
    ///
    /// A missing status falls back to [`Status::SendInvite`].
    pub fn new(name: impl Into<String>, email: impl Into<String>, status: Option<Status>) -> Self {
        let email = email.into();
        Self {
            id: UserId::from_email(&email),
            name: name.into(),
            email,
            status: status.unwrap_or_default(),
        }
    }

    /// Returns whether `identifier` is this user's id or email.
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.as_str() == identifier || self.email == identifier
    }

    /// Returns the fields that would corrupt the line format if written.
    pub fn unsafe_fields(&self) -> Vec<&'static str> {
        let is_unsafe = |s: &str| s.contains([FIELD_SEPARATOR, '\n', '\r']);
        let mut fields = Vec::new();
        if is_unsafe(&self.name) {
            fields.push("name");
        }
        if is_unsafe(&self.email) {
            fields.push("email");
        }
        if is_unsafe(self.status.as_str()) {
            fields.push("status");
        }
        fields
    }

    /// Encodes the user as a store line, without the terminator.
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.id,
            self.name,
            self.email,
            self.status,
            sep = FIELD_SEPARATOR
        )
    }

    /// Parses one store line.
    ///
    /// Returns `None` unless the line holds exactly four fields. Trailing
    /// empty fields are discarded before counting, so `a;b;c;` is rejected.
    /// A trailing `\r` is ignored.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }

        match parts.as_slice() {
            [id, name, email, status] => Some(Self {
                id: UserId::new(*id),
                name: name.to_string(),
                email: email.to_string(),
                status: Status::from(*status),
            }),
            _ => None,
        }
    }
}
