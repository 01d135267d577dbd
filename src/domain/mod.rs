//! Domain resources. Each module declares its descriptor once and exposes the
//! typed resource built by the factory.

pub mod account_tag;
pub mod branch;
pub mod currency;
pub mod invitation_code;
pub mod ledger_entry;
pub mod member;
pub mod payment_type;

use crate::error::ConfigError;
use crate::service::Resource;
use crate::state::DataContext;

/// Every domain resource, built against one shared context.
#[derive(Clone, Debug)]
pub struct Resources {
    pub account_tags: Resource<account_tag::AccountTag>,
    pub branches: Resource<branch::Branch>,
    pub currencies: Resource<currency::Currency>,
    pub invitation_codes: Resource<invitation_code::InvitationCode>,
    pub ledger_entries: Resource<ledger_entry::LedgerEntry>,
    pub members: Resource<member::Member>,
    pub payment_types: Resource<payment_type::PaymentType>,
}

impl Resources {
    pub fn register(ctx: &DataContext) -> Result<Self, ConfigError> {
        Ok(Self {
            account_tags: account_tag::resource(ctx)?,
            branches: branch::resource(ctx)?,
            currencies: currency::resource(ctx)?,
            invitation_codes: invitation_code::resource(ctx)?,
            ledger_entries: ledger_entry::resource(ctx)?,
            members: member::resource(ctx)?,
            payment_types: payment_type::resource(ctx)?,
        })
    }
}
