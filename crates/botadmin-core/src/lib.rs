pub mod config;
pub mod controller;
pub mod fields;
pub mod layout;
pub mod locale;
pub mod tenant;
pub mod upload;
pub mod validator;

// Re-export main types for convenience
pub use config::Config;
pub use controller::{FormController, SubmitOutcome, SUCCESS_NOTICE_DURATION};
pub use fields::{FieldKey, FormData, FormErrors, FormField, FORM_FIELDS, IDENTITY_FIELDS};
pub use layout::{place_prompt_above_grid, ViewportClass};
pub use locale::{Dictionary, Locale};
pub use tenant::{SortKey, Tenant, TenantDirectory};
pub use upload::{
    parse_dropped_paths, DefaultAction, DragEvent, FileEntry, FileHandle, FileIngestionManager,
    FileRejection, UploadPolicy, UploadedFile,
};
pub use validator::{validate, validate_with};
