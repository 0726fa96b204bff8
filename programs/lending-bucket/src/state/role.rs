//! Role grant account
//!
//! One PDA per (role, grantee). The protocol owner implicitly holds every
//! role; everyone else needs an active grant.

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Bucket parameter setters, freeze/deprecate, reserve withdrawal
    BucketAdmin,
    /// Debt settlement on behalf of borrowers
    PositionManager,
    /// Freeze and distributor pause
    EmergencyAdmin,
}

impl Role {
    pub fn seed(&self) -> [u8; 1] {
        [*self as u8]
    }
}

/// Role grant account
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"bucket_role", role, grantee]
#[account]
pub struct RoleGrant {
    /// PDA bump seed
    pub bump: u8,

    pub role: Role,

    /// Account that received the role
    pub grantee: Pubkey,

    /// Owner that granted it
    pub granted_by: Pubkey,

    /// Revocation flag (cleared again by a fresh grant)
    pub is_revoked: bool,

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl RoleGrant {
    pub const SEED: &'static [u8] = b"bucket_role";

    pub fn space() -> usize {
        8 +     // discriminator
        1 +     // bump
        1 +     // role
        32 +    // grantee
        32 +    // granted_by
        1 +     // is_revoked
        32      // reserved
    }

    /// Whether this grant gives `caller` the `role`
    pub fn is_valid(&self, role: Role, caller: &Pubkey) -> bool {
        self.role == role && &self.grantee == caller && !self.is_revoked
    }
}

/// Role predicate: the owner holds every role, others need a live grant
pub fn has_role(
    role: Role,
    caller: &Pubkey,
    owner: &Pubkey,
    grant: Option<&RoleGrant>,
) -> bool {
    caller == owner || grant.is_some_and(|g| g.is_valid(role, caller))
}

/// Derive role grant PDA
pub fn derive_role_grant(program_id: &Pubkey, role: Role, grantee: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PROGRAM_SEED_PREFIX,
            RoleGrant::SEED,
            &role.seed(),
            grantee.as_ref(),
        ],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(role: Role, grantee: Pubkey) -> RoleGrant {
        RoleGrant {
            bump: 0,
            role,
            grantee,
            granted_by: Pubkey::new_unique(),
            is_revoked: false,
            reserved: [0u8; 32],
        }
    }

    #[test]
    fn test_owner_has_every_role() {
        let owner = Pubkey::new_unique();
        assert!(has_role(Role::BucketAdmin, &owner, &owner, None));
        assert!(has_role(Role::EmergencyAdmin, &owner, &owner, None));
    }

    #[test]
    fn test_grant_is_role_specific() {
        let owner = Pubkey::new_unique();
        let manager = Pubkey::new_unique();
        let g = grant(Role::PositionManager, manager);

        assert!(has_role(Role::PositionManager, &manager, &owner, Some(&g)));
        assert!(!has_role(Role::BucketAdmin, &manager, &owner, Some(&g)));
        assert!(!has_role(Role::PositionManager, &Pubkey::new_unique(), &owner, Some(&g)));
    }

    #[test]
    fn test_revoked_grant() {
        let owner = Pubkey::new_unique();
        let admin = Pubkey::new_unique();
        let mut g = grant(Role::BucketAdmin, admin);
        g.is_revoked = true;
        assert!(!has_role(Role::BucketAdmin, &admin, &owner, Some(&g)));
        assert!(!has_role(Role::BucketAdmin, &admin, &owner, None));
    }
}
