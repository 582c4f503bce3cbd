//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bills: Arc<RwLock<Vec<Bill>>>,
    rates: Arc<RwLock<ExchangeRateTable>>,
    payout_profiles: Arc<RwLock<HashMap<String, OwnerPayoutProfile>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the exchange-rate snapshot
    pub fn set_exchange_rates(&self, rates: ExchangeRateTable) -> BillingResult<()> {
        *write(&self.rates)? = rates;
        Ok(())
    }

    /// Register the owner payout settings of a property
    pub fn set_owner_payout_profile(
        &self,
        property_id: &str,
        profile: OwnerPayoutProfile,
    ) -> BillingResult<()> {
        write(&self.payout_profiles)?.insert(property_id.to_string(), profile);
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> BillingResult<()> {
        write(&self.bills)?.clear();
        *write(&self.rates)? = ExchangeRateTable::new();
        write(&self.payout_profiles)?.clear();
        Ok(())
    }
}

fn read<T>(lock: &RwLock<T>) -> BillingResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| BillingError::Storage("storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> BillingResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| BillingError::Storage("storage lock poisoned".to_string()))
}

#[async_trait]
impl BillingStorage for MemoryStorage {
    async fn save_bill(&mut self, bill: &Bill) -> BillingResult<()> {
        let mut bills = write(&self.bills)?;
        if bills.iter().any(|existing| existing.id == bill.id) {
            return Err(BillingError::Storage(format!(
                "Bill '{}' already exists",
                bill.id
            )));
        }
        bills.push(bill.clone());
        Ok(())
    }

    async fn get_bill(&self, bill_id: &str) -> BillingResult<Option<Bill>> {
        Ok(read(&self.bills)?
            .iter()
            .find(|bill| bill.id == bill_id)
            .cloned())
    }

    async fn update_bill(&mut self, bill: &Bill) -> BillingResult<()> {
        let mut bills = write(&self.bills)?;
        match bills.iter_mut().find(|existing| existing.id == bill.id) {
            Some(existing) => {
                *existing = bill.clone();
                Ok(())
            }
            None => Err(BillingError::BillNotFound(bill.id.clone())),
        }
    }

    async fn list_renter_bills(&self, renter_id: &str) -> BillingResult<Vec<Bill>> {
        Ok(read(&self.bills)?
            .iter()
            .filter(|bill| bill.renter_id.as_deref() == Some(renter_id))
            .cloned()
            .collect())
    }

    async fn exchange_rates(&self) -> BillingResult<ExchangeRateTable> {
        Ok(read(&self.rates)?.clone())
    }

    async fn owner_payout_profile(
        &self,
        property_id: &str,
    ) -> BillingResult<Option<OwnerPayoutProfile>> {
        Ok(read(&self.payout_profiles)?.get(property_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn bill(renter: &str) -> Bill {
        let mut bill = Bill::new(
            "prop-1".to_string(),
            "Water".to_string(),
            BillType::Utilities,
            BigDecimal::from(75),
            "RON".to_string(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        bill.renter_id = Some(renter.to_string());
        bill
    }

    #[tokio::test]
    async fn test_bill_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut water = bill("renter-1");
        storage.save_bill(&water).await.unwrap();
        storage.save_bill(&bill("renter-2")).await.unwrap();

        assert!(storage.save_bill(&water).await.is_err());

        water.status = BillStatus::Paid;
        storage.update_bill(&water).await.unwrap();
        let stored = storage.get_bill(&water.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BillStatus::Paid);

        let renter_bills = storage.list_renter_bills("renter-1").await.unwrap();
        assert_eq!(renter_bills.len(), 1);
        assert!(storage.list_renter_bills("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_bill() {
        let mut storage = MemoryStorage::new();
        let err = storage.update_bill(&bill("renter-1")).await.unwrap_err();
        assert!(matches!(err, BillingError::BillNotFound(_)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        handle
            .set_owner_payout_profile("prop-1", OwnerPayoutProfile::default())
            .unwrap();
        assert!(storage
            .owner_payout_profile("prop-1")
            .await
            .unwrap()
            .is_some());

        storage.clear().unwrap();
        assert!(handle.owner_payout_profile("prop-1").await.unwrap().is_none());
    }
}
