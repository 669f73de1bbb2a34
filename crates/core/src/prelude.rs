//! Buckery prelude.
//!
//! Convenience exports for the storefront client.

pub use crate::{
    cart::{CartError, CartLine, CartStore},
    checkout::{
        CheckoutError, CheckoutFlow, CheckoutState, DeliveryMethod, DraftStore, OrderDraft,
        OrderDraftForm, OrderTotals, PaymentProof, PaymentSubmission, ProofError,
        ValidationError,
    },
    ids::ProductId,
    money::{Amount, format_rupiah},
    payments::{PaymentMethod, PaymentStatus},
    routes::{Area, GuardDecision, Route},
    session::{Credentials, Role, Session, SessionStore},
    storage::{
        CookieJar, FileCookieJar, FileStorage, LocalStorage, MemoryCookieJar, MemoryStorage,
        StorageError,
    },
};
