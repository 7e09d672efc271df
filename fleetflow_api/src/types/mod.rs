mod de;

mod pagination;
pub use self::pagination::{Pagination, PaginationLinks, PaginationMeta};

mod resource;
pub use self::resource::{mutation_intent, Entity, Resource, ResourceId, SERVER_ASSIGNED_FIELDS};

mod kind;
pub use self::kind::ResourceKind;

mod fleet;
pub use self::fleet::{Customer, Driver, LoginResponse, RouteCharge, User, Vehicle, VehicleType};

mod billing;
pub use self::billing::{
    format_amount, CreditNote, CreditNoteItem, Expense, Invoice, InvoiceItem, Payment,
};

mod linked;
pub use self::linked::{Document, Journal, JournalType, LinkedRecord, OwnerKind};

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &ResourceId {
                    &self.id
                }
            }
        )*
    };
}

impl_entity!(
    User,
    Customer,
    VehicleType,
    Vehicle,
    Driver,
    RouteCharge,
    Invoice,
    InvoiceItem,
    CreditNote,
    CreditNoteItem,
    Expense,
    Payment,
    Document,
    Journal,
);
