//! Delegation registry. An owner without an entry is undelegated.

use odra::prelude::*;

#[odra::module]
pub struct DelegationRegistry {
    delegates: Mapping<Address, Option<Address>>,
}

#[odra::module]
impl DelegationRegistry {
    pub fn delegate_of(&self, owner: &Address) -> Option<Address> {
        self.delegates.get(owner).flatten()
    }

    /// Point `owner` at `to` and return the delegate it replaced.
    pub fn set_delegate(&mut self, owner: &Address, to: Option<Address>) -> Option<Address> {
        let previous = self.delegate_of(owner);
        self.delegates.set(owner, to);
        previous
    }
}
