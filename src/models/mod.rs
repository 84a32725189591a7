mod application;
mod category;
pub(crate) mod de;
mod identity;
mod profile;

pub use application::{
    APPLICATIONS_TABLE, ApplicationData, ApplicationStatus, NewApplication, ProviderApplication,
};
pub use category::{CATEGORIES_TABLE, Category, CategoryLink, PROVIDER_CATEGORIES_TABLE};
pub use identity::{Identity, NewIdentity};
pub use profile::{
    CUSTOMERS_TABLE, CustomerProfile, NewCustomerProfile, NewProviderProfile,
    PROVIDER_PROFILES_TABLE, ProviderProfile,
};
