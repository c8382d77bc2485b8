use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use sales_core_db::models::{DepartmentModel, UserModel, ZoneModel};
use sales_core_db::repository::{
    AmountAggregate, DateRange, Load, OwnershipFilter, UnitOfWork, UnitOfWorkSession,
};

use crate::error::ServiceResult;
use crate::scope::{authorize, filter, role_gate, Operation, ResourceOwner, Scope};

/// Sum, count and mean of contract amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AmountSummary {
    pub total_amount: Decimal,
    pub count: i64,
    /// Zero when no contract matched
    pub average_amount: Decimal,
}

impl From<AmountAggregate> for AmountSummary {
    fn from(aggregate: AmountAggregate) -> Self {
        let average_amount = if aggregate.count == 0 {
            Decimal::ZERO
        } else {
            (aggregate.total / Decimal::from(aggregate.count)).round_dp(2)
        };
        Self {
            total_amount: aggregate.total,
            count: aggregate.count,
            average_amount,
        }
    }
}

/// Read-only aggregations over contracts, scoped like contract reads
pub struct PerformanceReports<U> {
    store: Arc<U>,
}

impl<U: UnitOfWork> PerformanceReports<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub async fn saler_performance(
        &self,
        actor: &Scope,
        saler_id: Uuid,
        period: Option<DateRange>,
    ) -> ServiceResult<AmountSummary> {
        role_gate(actor, Operation::ReportPerformance)?;
        let session = self.store.begin().await?;
        let saler: UserModel = session.users().load(saler_id).await?;
        authorize(actor, Operation::ReportPerformance, &ResourceOwner::of_user(&saler))?;
        summarize(&session, OwnershipFilter::Saler(saler.id), period).await
    }

    pub async fn department_performance(
        &self,
        actor: &Scope,
        department_id: Uuid,
        period: Option<DateRange>,
    ) -> ServiceResult<AmountSummary> {
        role_gate(actor, Operation::ReportPerformance)?;
        let session = self.store.begin().await?;
        let department: DepartmentModel = session.departments().load(department_id).await?;
        authorize(
            actor,
            Operation::ReportPerformance,
            &ResourceOwner::department(department.id, department.zone_id),
        )?;
        summarize(&session, OwnershipFilter::Department(department.id), period).await
    }

    pub async fn zone_performance(
        &self,
        actor: &Scope,
        zone_id: Uuid,
        period: Option<DateRange>,
    ) -> ServiceResult<AmountSummary> {
        role_gate(actor, Operation::ReportPerformance)?;
        let session = self.store.begin().await?;
        let zone: ZoneModel = session.zones().load(zone_id).await?;
        authorize(actor, Operation::ReportPerformance, &ResourceOwner::zone(zone.id))?;
        summarize(&session, OwnershipFilter::Zone(zone.id), period).await
    }

    /// Every contract the actor may read, optionally within `period`
    pub async fn loan_analysis(
        &self,
        actor: &Scope,
        period: Option<DateRange>,
    ) -> ServiceResult<AmountSummary> {
        let filter = filter(actor, Operation::LoanAnalysis)?;
        let session = self.store.begin().await?;
        summarize(&session, filter, period).await
    }
}

async fn summarize<S: UnitOfWorkSession>(
    session: &S,
    filter: OwnershipFilter,
    period: Option<DateRange>,
) -> ServiceResult<AmountSummary> {
    let aggregate = session.contracts().aggregate_amount(filter, period).await?;
    Ok(AmountSummary::from(aggregate))
}
