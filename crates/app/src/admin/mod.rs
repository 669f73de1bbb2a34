//! Back office
//!
//! Every admin page checks the role gate when mounted. Resource pages share
//! one controller, [`CrudPage`]; staff and payment review have their own.

mod contact_info;
mod content;
mod crud;
mod payment_monitor;
mod products;
mod resource;
mod staff;

pub use contact_info::{ContactInfoForm, ContactInfoPage};
pub use content::{TeamMemberForm, TestimonialForm, TimelineEventForm};
pub use crud::{CrudPage, Editor, EditorMode};
pub use payment_monitor::{PaymentMonitorPage, StatusFilter};
pub use products::{CategoryForm, ProductForm};
pub use resource::{Activatable, IMAGE_FIELD, ImageUpload, Resource};
pub use staff::StaffPage;
