//! Rebasing balance ledger
//!
//! A ledger is a scaled total supply plus the index that rebases it.
//! Holder balances live on the holder's account and are passed in by
//! reference, so `scaled_total_supply == Σ scaled_balance` is kept by
//! updating both sides in the same call.

use anchor_lang::prelude::*;
use crate::errors::BucketError;
use crate::math::{checked_add, checked_sub, to_live, to_scaled};

pub struct Ledger<'a> {
    scaled_total_supply: &'a mut u128,
    index: u128,
    transferable: bool,
}

impl<'a> Ledger<'a> {
    /// Supply ("P") ledger, rebased by the liquidity index
    pub fn supply(scaled_total_supply: &'a mut u128, liquidity_index: u128) -> Self {
        Self { scaled_total_supply, index: liquidity_index, transferable: true }
    }

    /// Debt ("D") ledger, rebased by the variable borrow index
    pub fn debt(scaled_total_supply: &'a mut u128, variable_borrow_index: u128) -> Self {
        Self { scaled_total_supply, index: variable_borrow_index, transferable: false }
    }

    /// Live balance of a holder, rounded down
    pub fn balance_of(&self, scaled_balance: u128) -> Result<u128> {
        to_live(scaled_balance, self.index)
    }

    /// Live total supply, rounded down
    pub fn total_supply(&self) -> Result<u128> {
        to_live(*self.scaled_total_supply, self.index)
    }

    /// Mint `amount` (live units) to a holder; returns the scaled amount
    pub fn mint(&mut self, holder: &mut u128, amount: u128) -> Result<u128> {
        require!(amount > 0, BucketError::InvalidAmount);
        let scaled = to_scaled(amount, self.index)?;
        require!(scaled > 0, BucketError::InvalidMintAmount);

        *holder = checked_add(*holder, scaled)?;
        *self.scaled_total_supply = checked_add(*self.scaled_total_supply, scaled)?;
        Ok(scaled)
    }

    /// Credit already-scaled units to a holder
    pub fn mint_scaled(&mut self, holder: &mut u128, scaled: u128) -> Result<()> {
        *holder = checked_add(*holder, scaled)?;
        *self.scaled_total_supply = checked_add(*self.scaled_total_supply, scaled)?;
        Ok(())
    }

    /// Burn `amount` (live units) from a holder; returns the scaled amount
    ///
    /// A one-unit rounding overshoot is clamped to the holder's balance;
    /// anything larger fails with `InvalidBurnAmount`.
    pub fn burn(&mut self, holder: &mut u128, amount: u128) -> Result<u128> {
        require!(amount > 0, BucketError::InvalidAmount);
        let mut scaled = to_scaled(amount, self.index)?;
        require!(scaled > 0, BucketError::InvalidBurnAmount);

        if scaled > *holder {
            require!(scaled - *holder <= 1, BucketError::InvalidBurnAmount);
            scaled = *holder;
        }

        self.burn_scaled(holder, scaled)?;
        Ok(scaled)
    }

    /// Burn the holder's entire balance; returns (scaled, live) burned
    pub fn burn_all(&mut self, holder: &mut u128) -> Result<(u128, u128)> {
        let scaled = *holder;
        require!(scaled > 0, BucketError::InvalidBurnAmount);
        let live = self.balance_of(scaled)?;
        self.burn_scaled(holder, scaled)?;
        Ok((scaled, live))
    }

    fn burn_scaled(&mut self, holder: &mut u128, scaled: u128) -> Result<()> {
        *holder = checked_sub(*holder, scaled)?;
        *self.scaled_total_supply = checked_sub(*self.scaled_total_supply, scaled)?;
        Ok(())
    }

    /// Move `amount` (live units) between holders; total supply unchanged
    pub fn transfer(&mut self, from: &mut u128, to: &mut u128, amount: u128) -> Result<u128> {
        require!(self.transferable, BucketError::DebtTransferNotAllowed);
        require!(amount > 0, BucketError::InvalidAmount);
        let live = self.balance_of(*from)?;
        require!(amount <= live, BucketError::InsufficientBalance);

        let scaled = to_scaled(amount, self.index)?.min(*from);
        require!(scaled > 0, BucketError::InvalidAmount);

        *from = checked_sub(*from, scaled)?;
        *to = checked_add(*to, scaled)?;
        Ok(scaled)
    }
}
