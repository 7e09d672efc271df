//! Polymorphic relations: the owner of a document and the target of a journal entry.
//!
//! The kind is resolved once, while the record is decoded. An explicit
//! discriminator from the server (`owner_type`, `documentable_type`,
//! `journalable_type`, or a `kind` written by [`LinkedRecord`] itself) wins;
//! the code prefix convention (`DRI-`, `VEH-`, `EXP-`, `PAY-`) is only the
//! fallback for payloads that carry no discriminator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use super::fleet::Customer;
use super::resource::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Driver,
    Vehicle,
    Expense,
    Payment,
    Unknown,
}

impl OwnerKind {
    /// Resolves a kind from a record code such as `DRI-0004`.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        if code.starts_with("DRI-") {
            OwnerKind::Driver
        } else if code.starts_with("VEH-") {
            OwnerKind::Vehicle
        } else if code.starts_with("EXP-") {
            OwnerKind::Expense
        } else if code.starts_with("PAY-") {
            OwnerKind::Payment
        } else {
            OwnerKind::Unknown
        }
    }

    /// Resolves an explicit discriminator: `driver`, `Vehicle` or a model
    /// class name like `App\Models\Expense`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let last = name.rsplit('\\').next()?.trim().to_ascii_lowercase();
        match last.as_str() {
            "driver" => Some(OwnerKind::Driver),
            "vehicle" => Some(OwnerKind::Vehicle),
            "expense" => Some(OwnerKind::Expense),
            "payment" => Some(OwnerKind::Payment),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OwnerKind::Driver => "Driver",
            OwnerKind::Vehicle => "Vehicle",
            OwnerKind::Expense => "Expense",
            OwnerKind::Payment => "Payment",
            OwnerKind::Unknown => "Entry",
        }
    }
}

impl std::str::FromStr for OwnerKind {
    type Err = String;

    /// Accepts the same names as [`OwnerKind::from_type_name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OwnerKind::from_type_name(s).ok_or_else(|| {
            format!("unknown owner kind: {} (expected driver, vehicle, expense or payment)", s)
        })
    }
}

/// A resolved reference to another record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedRecord {
    pub kind: OwnerKind,
    pub id: Option<ResourceId>,
    pub code: Option<String>,
    /// Display text, e.g. `Driver: Jane Wanjiku`.
    pub label: String,
}

impl LinkedRecord {
    fn resolve(
        discriminator: Option<&str>,
        object: Option<&Map<String, Value>>,
        fallback_id: Option<ResourceId>,
    ) -> Option<Self> {
        if discriminator.is_none() && object.is_none() && fallback_id.is_none() {
            return None;
        }
        let code = object
            .and_then(|o| o.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let id = object
            .and_then(|o| o.get("id"))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .or(fallback_id);
        let embedded_kind = object
            .and_then(|o| o.get("kind"))
            .and_then(Value::as_str);
        let kind = discriminator
            .or(embedded_kind)
            .and_then(OwnerKind::from_type_name)
            .or_else(|| code.as_deref().map(OwnerKind::from_code))
            .unwrap_or(OwnerKind::Unknown);
        let label = object
            .and_then(|o| o.get("label"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| describe(kind, object, code.as_deref()));
        Some(Self {
            kind,
            id,
            code,
            label,
        })
    }
}

fn describe(kind: OwnerKind, object: Option<&Map<String, Value>>, code: Option<&str>) -> String {
    let field = |key: &str| {
        object
            .and_then(|o| o.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let detail = match kind {
        OwnerKind::Driver => field("name").or(code),
        OwnerKind::Vehicle => field("registration_number").or(field("brand")).or(code),
        OwnerKind::Expense | OwnerKind::Payment => code,
        OwnerKind::Unknown => return code.unwrap_or("N/A").to_string(),
    };
    match detail {
        Some(detail) => format!("{}: {}", kind.label(), detail),
        None => kind.label().to_string(),
    }
}

#[derive(Deserialize)]
struct RawDocument {
    id: ResourceId,
    code: Option<String>,
    file_type: Option<String>,
    file_path: Option<String>,
    upload_date: Option<String>,
    owner_type: Option<String>,
    owner_id: Option<ResourceId>,
    owner: Option<Map<String, Value>>,
    documentable_type: Option<String>,
    documentable_id: Option<ResourceId>,
    documentable: Option<Map<String, Value>>,
}

/// An uploaded file (licence, log book, receipt, ...) attached to one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    pub id: ResourceId,
    pub code: Option<String>,
    pub file_type: Option<String>,
    pub file_path: Option<String>,
    pub upload_date: Option<String>,
    pub owner: Option<LinkedRecord>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let discriminator = raw.owner_type.or(raw.documentable_type);
        let object = raw.owner.or(raw.documentable);
        let owner = LinkedRecord::resolve(
            discriminator.as_deref(),
            object.as_ref(),
            raw.owner_id.or(raw.documentable_id),
        );
        Self {
            id: raw.id,
            code: raw.code,
            file_type: raw.file_type,
            file_path: raw.file_path,
            upload_date: raw.upload_date,
            owner,
        }
    }
}

impl Document {
    /// True when this document is attached to the `kind` record with `id`.
    /// Driver 7 and vehicle 7 are different owners. An owner whose kind could
    /// not be resolved matches on id alone.
    pub fn belongs_to(&self, kind: OwnerKind, id: &ResourceId) -> bool {
        self.owner.as_ref().is_some_and(|owner| {
            let same_kind = owner.kind == kind
                || owner.kind == OwnerKind::Unknown
                || kind == OwnerKind::Unknown;
            same_kind && owner.id.as_ref().is_some_and(|owner_id| owner_id.matches(id))
        })
    }
}

/// Direction of a journal entry. The backend historically stored debits
/// under the value `LICENSE`, so both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalType {
    Credit,
    Debit,
}

impl JournalType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Some(JournalType::Credit),
            "DEBIT" | "LICENSE" => Some(JournalType::Debit),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawJournal {
    id: ResourceId,
    code: Option<String>,
    journal_type: Option<String>,
    currency: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    amount: Option<f64>,
    customer_id: Option<ResourceId>,
    customer: Option<Customer>,
    journalable_type: Option<String>,
    journalable_id: Option<ResourceId>,
    #[serde(alias = "journalable")]
    journal_target: Option<Map<String, Value>>,
    target: Option<Map<String, Value>>,
    created_at: Option<String>,
}

/// A ledger line against a customer, linked to the expense or payment that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawJournal")]
pub struct Journal {
    pub id: ResourceId,
    pub code: Option<String>,
    pub journal_type: Option<String>,
    pub currency: Option<String>,
    pub amount: Option<f64>,
    pub customer_id: Option<ResourceId>,
    pub customer: Option<Customer>,
    pub target: Option<LinkedRecord>,
    pub created_at: Option<String>,
}

impl From<RawJournal> for Journal {
    fn from(raw: RawJournal) -> Self {
        let object = raw.journal_target.or(raw.target);
        let target = LinkedRecord::resolve(
            raw.journalable_type.as_deref(),
            object.as_ref(),
            raw.journalable_id,
        );
        Self {
            id: raw.id,
            code: raw.code,
            journal_type: raw.journal_type,
            currency: raw.currency,
            amount: raw.amount,
            customer_id: raw.customer_id,
            customer: raw.customer,
            target,
            created_at: raw.created_at,
        }
    }
}

impl Journal {
    pub fn direction(&self) -> Option<JournalType> {
        self.journal_type.as_deref().and_then(JournalType::parse)
    }

    /// "Payment recorded for Acme Ltd".
    pub fn description(&self) -> String {
        let kind = self
            .target
            .as_ref()
            .map(|t| t.kind.label())
            .unwrap_or("Entry");
        let customer = self
            .customer
            .as_ref()
            .map(|c| c.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("customer");
        format!("{} recorded for {}", kind, customer)
    }
}
