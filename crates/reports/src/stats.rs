//! Dashboard statistics
//!
//! Aggregates computed over offense and payment data fetched through
//! the business layer. Everything here is pure: callers fetch, this
//! module counts and sums.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use trafdesk_core::{
    DeletionRequest, OffenceType, Offense, OffenseStatus, Payment, PaymentMethod, RequestStatus,
};

use crate::exporters::ReportData;

/// Offense counts broken down the way the dashboard shows them.
#[derive(Debug, Clone)]
pub struct OffenseStats {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub by_type: Vec<(OffenceType, usize)>,
    pub paid: usize,
    pub unpaid: usize,
    pub pending: usize,
    /// Offenses per calendar month, "YYYY-MM" keys in ascending order
    pub monthly: Vec<(String, usize)>,
}

impl OffenseStats {
    pub fn from_offenses(offenses: &[Offense]) -> Self {
        let mut paid = 0;
        let mut unpaid = 0;
        let mut pending = 0;
        let mut monthly: BTreeMap<String, usize> = BTreeMap::new();
        let mut type_counts: BTreeMap<&'static str, usize> = BTreeMap::new();

        for offense in offenses {
            match offense.status {
                OffenseStatus::Paid => paid += 1,
                OffenseStatus::Unpaid => unpaid += 1,
                OffenseStatus::Pending => pending += 1,
            }
            *type_counts.entry(offense.offence_type.as_str()).or_default() += 1;
            let month = format!("{:04}-{:02}", offense.date.year(), offense.date.month());
            *monthly.entry(month).or_default() += 1;
        }

        // Every known type appears, zero or not, so charts keep a
        // stable shape
        let by_type = OffenceType::all()
            .iter()
            .map(|t| (*t, type_counts.get(t.as_str()).copied().unwrap_or(0)))
            .collect();

        Self {
            generated_at: Utc::now(),
            total: offenses.len(),
            by_type,
            paid,
            unpaid,
            pending,
            monthly: monthly.into_iter().collect(),
        }
    }
}

impl ReportData for OffenseStats {
    fn title(&self) -> &str {
        "Offense Statistics"
    }

    fn headers(&self) -> Vec<String> {
        vec!["Offence Type".to_string(), "Count".to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.by_type
            .iter()
            .map(|(t, n)| vec![t.as_str().to_string(), n.to_string()])
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Total Offenses".to_string(), self.total.to_string()),
            ("Paid".to_string(), self.paid.to_string()),
            ("Unpaid".to_string(), self.unpaid.to_string()),
            ("Pending".to_string(), self.pending.to_string()),
        ]
    }
}

/// Collections overview for the payments dashboard.
#[derive(Debug, Clone)]
pub struct PaymentStats {
    pub generated_at: DateTime<Utc>,
    pub payment_count: usize,
    pub total_collected: Decimal,
    pub collected_today: Decimal,
    /// Sum of fines on offenses not yet paid
    pub outstanding: Decimal,
    pub by_method: Vec<(PaymentMethod, Decimal)>,
}

impl PaymentStats {
    pub fn from_data(payments: &[Payment], offenses: &[Offense]) -> Self {
        let today = Utc::now().date_naive();
        let mut total_collected = Decimal::ZERO;
        let mut collected_today = Decimal::ZERO;
        let mut method_totals: BTreeMap<&'static str, Decimal> = BTreeMap::new();

        for payment in payments {
            total_collected += payment.amount;
            if payment.date.date_naive() == today {
                collected_today += payment.amount;
            }
            *method_totals.entry(payment.method.as_str()).or_default() += payment.amount;
        }

        let outstanding = offenses
            .iter()
            .filter(|o| o.status != OffenseStatus::Paid)
            .map(|o| o.fine)
            .sum();

        let by_method = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::MobileMoney]
            .iter()
            .map(|m| {
                (
                    *m,
                    method_totals.get(m.as_str()).copied().unwrap_or(Decimal::ZERO),
                )
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            payment_count: payments.len(),
            total_collected,
            collected_today,
            outstanding,
            by_method,
        }
    }
}

impl ReportData for PaymentStats {
    fn title(&self) -> &str {
        "Collection Statistics"
    }

    fn headers(&self) -> Vec<String> {
        vec!["Method".to_string(), "Collected".to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.by_method
            .iter()
            .map(|(m, amount)| vec![m.as_str().to_string(), amount.to_string()])
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Payments".to_string(), self.payment_count.to_string()),
            ("Total Collected".to_string(), self.total_collected.to_string()),
            ("Collected Today".to_string(), self.collected_today.to_string()),
            ("Outstanding".to_string(), self.outstanding.to_string()),
        ]
    }
}

/// Deletion queue counts for the review screen header.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeletionQueueStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl DeletionQueueStats {
    pub fn from_requests(requests: &[DeletionRequest]) -> Self {
        let mut stats = Self::default();
        for request in requests {
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Approved => stats.approved += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use trafdesk_core::User;

    fn offense_on(date: DateTime<Utc>, kind: OffenceType, status: OffenseStatus) -> Offense {
        let mut o = Offense::new(
            "driver-1",
            "Asha Noor",
            "asha@example.com",
            "KAA-123",
            kind,
            "Main St",
            date,
            dec!(100),
        );
        o.status = status;
        o
    }

    #[test]
    fn test_offense_stats_counts_types_and_months() {
        let jan = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap();
        let offenses = vec![
            offense_on(jan, OffenceType::Speeding, OffenseStatus::Unpaid),
            offense_on(jan, OffenceType::Speeding, OffenseStatus::Paid),
            offense_on(feb, OffenceType::Parking, OffenseStatus::Unpaid),
        ];

        let stats = OffenseStats::from_offenses(&offenses);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.unpaid, 2);
        assert_eq!(
            stats.monthly,
            vec![("2026-01".to_string(), 2), ("2026-02".to_string(), 1)]
        );

        let speeding = stats
            .by_type
            .iter()
            .find(|(t, _)| *t == OffenceType::Speeding)
            .unwrap();
        assert_eq!(speeding.1, 2);
        // Zero-count types still listed
        assert!(stats.by_type.iter().any(|(t, n)| *t == OffenceType::DrunkDriving && *n == 0));
    }

    #[test]
    fn test_payment_stats_sums_and_outstanding() {
        let driver = User::driver("Asha Noor", "asha@example.com");
        let paid = offense_on(Utc::now(), OffenceType::Speeding, OffenseStatus::Paid);
        let mut unpaid = offense_on(Utc::now(), OffenceType::Parking, OffenseStatus::Unpaid);
        unpaid.fine = dec!(250);

        let payment = Payment::completed(
            &paid.id,
            &driver.id,
            &driver.name,
            &driver.email,
            "KAA-123",
            dec!(100),
            PaymentMethod::Card,
        );

        let stats = PaymentStats::from_data(&[payment], &[paid, unpaid]);
        assert_eq!(stats.total_collected, dec!(100));
        assert_eq!(stats.collected_today, dec!(100));
        assert_eq!(stats.outstanding, dec!(250));

        let card = stats
            .by_method
            .iter()
            .find(|(m, _)| *m == PaymentMethod::Card)
            .unwrap();
        assert_eq!(card.1, dec!(100));
    }

    #[test]
    fn test_deletion_queue_stats() {
        let offense = offense_on(Utc::now(), OffenceType::Other, OffenseStatus::Unpaid);
        let mut a = DeletionRequest::new(&offense, "user-1", "dup").unwrap();
        let b = DeletionRequest::new(&offense, "user-1", "dup").unwrap();
        a.status = RequestStatus::Approved;

        let stats = DeletionQueueStats::from_requests(&[a, b]);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 0);
    }
}
