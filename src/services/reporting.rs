//! Dashboard and analytics aggregation queries
//!
//! These are read-only projections over the fleet tables. Grouping happens
//! in memory after a ranged fetch; the record counts involved are small and
//! this keeps the queries portable across Postgres and SQLite.

use std::collections::HashMap;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{fuel, maintenance, panne, reparation, trip, vehicle};

type DateTimeUtc = chrono::DateTime<Utc>;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct KpiStats {
    pub total_vehicles: u64,
    pub planned_trips: u64,
    pub repairs_this_month: u64,
    pub fuel_cost_this_week: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FuelEfficiencyData {
    pub current_month_volume: f64,
    pub last_month_volume: f64,
    pub percentage_change: Option<f64>,
    pub trend: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceInsights {
    pub fuel_efficiency: FuelEfficiencyData,
    pub total_maintenance_records: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertItem {
    pub plate_number: String,
    pub message: String,
    pub entity_type: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsResponse {
    pub critical_panne: Option<AlertItem>,
    pub maintenance_alert: Option<AlertItem>,
    pub trip_alert: Option<AlertItem>,
    pub total_alerts: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanneDetail {
    pub id: i32,
    pub plate_number: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub panne_date: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpcomingTrip {
    pub id: i32,
    pub plate_number: Option<String>,
    pub driver_name: Option<String>,
    pub start_location: String,
    pub end_location: String,
    pub start_time: chrono::DateTime<Utc>,
    pub purpose: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyActivity {
    pub labels: Vec<String>,
    pub trips: Vec<u64>,
    pub maintenances: Vec<u64>,
    pub pannes: Vec<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleStatusChart {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopDriver {
    pub driver_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub completed_trips: u64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct MonthlyExpense {
    pub month: String,
    pub fuel_cost: f64,
    pub reparation_cost: f64,
    pub maintenance_cost: f64,
    pub purchase_cost: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseSummary {
    pub total_fuel_cost: f64,
    pub total_reparation_cost: f64,
    pub total_maintenance_cost: f64,
    pub total_vehicle_purchase_cost: f64,
    pub monthly_breakdown: Vec<MonthlyExpense>,
}

#[derive(Debug, Default, Serialize)]
pub struct DetailedExpenses {
    pub fuel_records: Vec<fuel::Model>,
    pub reparation_records: Vec<reparation::Model>,
    pub maintenance_records: Vec<maintenance::Model>,
    pub purchase_records: Vec<vehicle::Model>,
}

// ============================================================================
// Date helpers
// ============================================================================

fn month_start(year: i32, month: u32) -> DateTimeUtc {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default()
        .format("%b '%y")
        .to_string()
}

fn day_start(date: NaiveDate) -> DateTimeUtc {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Exclusive end bound for a date-inclusive range.
fn day_after(date: NaiveDate) -> DateTimeUtc {
    day_start(date.checked_add_days(Days::new(1)).unwrap_or(date))
}

// ============================================================================
// Dashboard queries
// ============================================================================

pub async fn dashboard_kpis(db: &DatabaseConnection) -> Result<KpiStats> {
    let total_vehicles = Vehicle::find().count(db).await?;

    let planned_trips = Trip::find()
        .filter(trip::Column::Status.eq("planned"))
        .count(db)
        .await?;

    let today = Utc::now().date_naive();
    let (year, month) = (today.year(), today.month());
    let this_month = month_start(year, month);
    let (ny, nm) = next_month(year, month);
    let next_month_start = month_start(ny, nm);

    let repairs_this_month = Reparation::find()
        .filter(reparation::Column::RepairDate.gte(this_month))
        .filter(reparation::Column::RepairDate.lt(next_month_start))
        .count(db)
        .await?;

    // Week runs Monday to Sunday.
    let week_start = day_start(today - Duration::days(today.weekday().num_days_from_monday() as i64));
    let week_end = week_start + Duration::days(7);

    let week_fuel = Fuel::find()
        .filter(fuel::Column::CreatedAt.gte(week_start))
        .filter(fuel::Column::CreatedAt.lt(week_end))
        .all(db)
        .await?;
    let fuel_cost_this_week: f64 = week_fuel.iter().map(|f| f.cost).sum();

    Ok(KpiStats {
        total_vehicles,
        planned_trips,
        repairs_this_month,
        fuel_cost_this_week: (fuel_cost_this_week * 100.0).round() / 100.0,
    })
}

pub async fn performance_insights(db: &DatabaseConnection) -> Result<PerformanceInsights> {
    let today = Utc::now().date_naive();
    let (year, month) = (today.year(), today.month());

    let current_start = month_start(year, month);
    let (ny, nm) = next_month(year, month);
    let current_end = month_start(ny, nm);
    let (py, pm) = prev_month(year, month);
    let last_start = month_start(py, pm);

    let current_month_volume: f64 = Fuel::find()
        .filter(fuel::Column::CreatedAt.gte(current_start))
        .filter(fuel::Column::CreatedAt.lt(current_end))
        .all(db)
        .await?
        .iter()
        .map(|f| f.quantity)
        .sum();

    let last_month_volume: f64 = Fuel::find()
        .filter(fuel::Column::CreatedAt.gte(last_start))
        .filter(fuel::Column::CreatedAt.lt(current_start))
        .all(db)
        .await?
        .iter()
        .map(|f| f.quantity)
        .sum();

    // Lower consumption than last month reads as an efficiency gain.
    let (percentage_change, trend) = if last_month_volume > 0.0 {
        let raw = if current_month_volume == 0.0 {
            100.0
        } else {
            (last_month_volume - current_month_volume) / last_month_volume * 100.0
        };
        let trend = if raw > 5.0 {
            "up"
        } else if raw < -5.0 {
            "down"
        } else {
            "steady"
        };
        (Some((raw * 10.0).round() / 10.0), trend.to_string())
    } else if current_month_volume > 0.0 {
        (Some(-100.0), "down".to_string())
    } else {
        (None, "no_comparison".to_string())
    };

    let total_maintenance_records = Maintenance::find().count(db).await?;

    Ok(PerformanceInsights {
        fuel_efficiency: FuelEfficiencyData {
            current_month_volume: (current_month_volume * 100.0).round() / 100.0,
            last_month_volume: (last_month_volume * 100.0).round() / 100.0,
            percentage_change,
            trend,
        },
        total_maintenance_records,
    })
}

async fn plate_for(db: &DatabaseConnection, vehicle_id: i32) -> Result<Option<String>> {
    Ok(Vehicle::find_by_id(vehicle_id)
        .one(db)
        .await?
        .map(|v| v.plate_number))
}

pub async fn dashboard_alerts(db: &DatabaseConnection) -> Result<AlertsResponse> {
    let critical_panne = match Panne::find()
        .order_by_desc(panne::Column::PanneDate)
        .one(db)
        .await?
    {
        Some(p) => {
            let plate = plate_for(db, p.vehicle_id).await?;
            let category = CategoryPanne::find_by_id(p.category_id).one(db).await?;
            let message = category
                .map(|c| c.name)
                .or(p.description.clone())
                .unwrap_or_else(|| "Issue details N/A".to_string());
            Some(AlertItem {
                plate_number: plate.unwrap_or_else(|| "N/A".to_string()),
                message,
                entity_type: "panne".to_string(),
                status: p.status,
            })
        }
        None => None,
    };

    let maintenance_alert = match Maintenance::find()
        .order_by_desc(maintenance::Column::MaintenanceDate)
        .one(db)
        .await?
    {
        Some(m) => {
            let plate = plate_for(db, m.vehicle_id).await?;
            let category = match m.category_id {
                Some(id) => CategoryMaintenance::find_by_id(id).one(db).await?,
                None => None,
            };
            let label = category
                .map(|c| c.name)
                .unwrap_or_else(|| "Maintenance Task".to_string());
            Some(AlertItem {
                plate_number: plate.unwrap_or_else(|| "N/A".to_string()),
                message: format!("{} (Due: {})", label, m.maintenance_date.format("%Y-%m-%d")),
                entity_type: "maintenance".to_string(),
                status: m.status,
            })
        }
        None => None,
    };

    let trip_alert = match Trip::find()
        .order_by_desc(trip::Column::StartTime)
        .one(db)
        .await?
    {
        Some(t) => {
            let plate = plate_for(db, t.vehicle_id).await?;
            Some(AlertItem {
                plate_number: plate.unwrap_or_else(|| "N/A".to_string()),
                message: format!(
                    "Purpose: {}",
                    t.purpose.unwrap_or_else(|| "General Trip".to_string())
                ),
                entity_type: "trip".to_string(),
                status: t.status,
            })
        }
        None => None,
    };

    let total_alerts = [&critical_panne, &maintenance_alert, &trip_alert]
        .iter()
        .filter(|a| a.is_some())
        .count();

    Ok(AlertsResponse {
        critical_panne,
        maintenance_alert,
        trip_alert,
        total_alerts,
    })
}

pub async fn recent_pannes(db: &DatabaseConnection, limit: u64) -> Result<Vec<PanneDetail>> {
    let pannes = Panne::find()
        .order_by_desc(panne::Column::PanneDate)
        .limit(limit)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(pannes.len());
    for p in pannes {
        let plate = plate_for(db, p.vehicle_id).await?;
        let category = CategoryPanne::find_by_id(p.category_id)
            .one(db)
            .await?
            .map(|c| c.name);
        details.push(PanneDetail {
            id: p.id,
            plate_number: plate,
            category,
            description: p.description,
            status: p.status,
            panne_date: p.panne_date,
        });
    }

    Ok(details)
}

pub async fn upcoming_trips(db: &DatabaseConnection, limit: u64) -> Result<Vec<UpcomingTrip>> {
    let now = Utc::now();
    let trips = Trip::find()
        .filter(trip::Column::StartTime.gte(now))
        .filter(trip::Column::Status.eq("planned"))
        .order_by_asc(trip::Column::StartTime)
        .limit(limit)
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(trips.len());
    for t in trips {
        let plate = plate_for(db, t.vehicle_id).await?;
        let driver_name = Driver::find_by_id(t.driver_id)
            .one(db)
            .await?
            .map(|d| format!("{} {}", d.first_name, d.last_name));
        result.push(UpcomingTrip {
            id: t.id,
            plate_number: plate,
            driver_name,
            start_location: t.start_location,
            end_location: t.end_location,
            start_time: t.start_time,
            purpose: t.purpose,
            status: t.status,
        });
    }

    Ok(result)
}

pub async fn monthly_activity(db: &DatabaseConnection, months: u32) -> Result<MonthlyActivity> {
    let today = Utc::now().date_naive();
    let months = months.max(1);

    // Walk back to the first month of the window.
    let (mut year, mut month) = (today.year(), today.month());
    for _ in 1..months {
        let (py, pm) = prev_month(year, month);
        year = py;
        month = pm;
    }

    let mut labels = Vec::with_capacity(months as usize);
    let mut trips_counts = Vec::with_capacity(months as usize);
    let mut maintenance_counts = Vec::with_capacity(months as usize);
    let mut panne_counts = Vec::with_capacity(months as usize);

    for _ in 0..months {
        let start = month_start(year, month);
        let (ny, nm) = next_month(year, month);
        let end = month_start(ny, nm);

        labels.push(month_label(year, month));

        trips_counts.push(
            Trip::find()
                .filter(trip::Column::StartTime.gte(start))
                .filter(trip::Column::StartTime.lt(end))
                .count(db)
                .await?,
        );
        maintenance_counts.push(
            Maintenance::find()
                .filter(maintenance::Column::MaintenanceDate.gte(start))
                .filter(maintenance::Column::MaintenanceDate.lt(end))
                .count(db)
                .await?,
        );
        panne_counts.push(
            Panne::find()
                .filter(panne::Column::PanneDate.gte(start))
                .filter(panne::Column::PanneDate.lt(end))
                .count(db)
                .await?,
        );

        year = ny;
        month = nm;
    }

    Ok(MonthlyActivity {
        labels,
        trips: trips_counts,
        maintenances: maintenance_counts,
        pannes: panne_counts,
    })
}

fn display_status(status: &str) -> String {
    match status {
        "available" => "Available".to_string(),
        "in_use" => "In Use".to_string(),
        "in_repair" => "In Repair".to_string(),
        "decommissioned" => "Decommissioned".to_string(),
        "sold" => "Sold".to_string(),
        other => {
            // Title-case unknown statuses rather than leaking raw values.
            other
                .split('_')
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

pub async fn vehicle_status_chart(db: &DatabaseConnection) -> Result<VehicleStatusChart> {
    // In-memory grouping; the vehicle table stays small.
    let vehicles = Vehicle::find().all(db).await?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for v in vehicles {
        *counts.entry(v.status).or_insert(0) += 1;
    }

    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(VehicleStatusChart {
        labels: entries.iter().map(|(s, _)| display_status(s)).collect(),
        counts: entries.into_iter().map(|(_, c)| c).collect(),
    })
}

pub async fn top_drivers(db: &DatabaseConnection, limit: usize) -> Result<Vec<TopDriver>> {
    let thirty_days_ago = Utc::now() - Duration::days(30);

    let completed = Trip::find()
        .filter(trip::Column::Status.eq("completed"))
        .filter(trip::Column::EndTime.gte(thirty_days_ago))
        .all(db)
        .await?;

    let mut counts: HashMap<i32, u64> = HashMap::new();
    for t in completed {
        *counts.entry(t.driver_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(i32, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);

    let mut result = Vec::with_capacity(ranked.len());
    for (driver_id, completed_trips) in ranked {
        if let Some(d) = Driver::find_by_id(driver_id).one(db).await? {
            result.push(TopDriver {
                driver_id,
                first_name: d.first_name,
                last_name: d.last_name,
                completed_trips,
            });
        }
    }

    Ok(result)
}

// ============================================================================
// Analytics queries
// ============================================================================

pub async fn expense_summary(
    db: &DatabaseConnection,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<ExpenseSummary> {
    let start = day_start(start_date);
    let end = day_after(end_date);

    let fuel_rows = Fuel::find()
        .filter(fuel::Column::CreatedAt.gte(start))
        .filter(fuel::Column::CreatedAt.lt(end))
        .all(db)
        .await?;

    let reparation_rows = Reparation::find()
        .filter(reparation::Column::RepairDate.gte(start))
        .filter(reparation::Column::RepairDate.lt(end))
        .all(db)
        .await?;

    let maintenance_rows = Maintenance::find()
        .filter(maintenance::Column::MaintenanceDate.gte(start))
        .filter(maintenance::Column::MaintenanceDate.lt(end))
        .all(db)
        .await?;

    let purchase_rows = Vehicle::find()
        .filter(vehicle::Column::PurchaseDate.gte(start))
        .filter(vehicle::Column::PurchaseDate.lt(end))
        .filter(vehicle::Column::PurchasePrice.gt(0.0))
        .all(db)
        .await?;

    let mut monthly: HashMap<(i32, u32), MonthlyExpense> = HashMap::new();

    let mut total_fuel_cost = 0.0;
    for f in &fuel_rows {
        total_fuel_cost += f.cost;
        let key = (f.created_at.year(), f.created_at.month());
        monthly.entry(key).or_default().fuel_cost += f.cost;
    }

    let mut total_reparation_cost = 0.0;
    for r in &reparation_rows {
        total_reparation_cost += r.cost;
        let key = (r.repair_date.year(), r.repair_date.month());
        monthly.entry(key).or_default().reparation_cost += r.cost;
    }

    let mut total_maintenance_cost = 0.0;
    for m in &maintenance_rows {
        total_maintenance_cost += m.cost;
        let key = (m.maintenance_date.year(), m.maintenance_date.month());
        monthly.entry(key).or_default().maintenance_cost += m.cost;
    }

    let mut total_vehicle_purchase_cost = 0.0;
    for v in &purchase_rows {
        if let Some(purchased) = v.purchase_date {
            total_vehicle_purchase_cost += v.purchase_price;
            let key = (purchased.year(), purchased.month());
            monthly.entry(key).or_default().purchase_cost += v.purchase_price;
        }
    }

    // Zero-filled month-by-month breakdown across the whole range.
    let mut monthly_breakdown = Vec::new();
    let (mut year, mut month) = (start_date.year(), start_date.month());
    let (end_year, end_month) = (end_date.year(), end_date.month());
    while (year, month) <= (end_year, end_month) {
        let mut item = monthly.remove(&(year, month)).unwrap_or_default();
        item.month = month_label(year, month);
        monthly_breakdown.push(item);
        let (ny, nm) = next_month(year, month);
        year = ny;
        month = nm;
    }

    Ok(ExpenseSummary {
        total_fuel_cost,
        total_reparation_cost,
        total_maintenance_cost,
        total_vehicle_purchase_cost,
        monthly_breakdown,
    })
}

pub async fn detailed_expense_records(
    db: &DatabaseConnection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    categories: &[String],
) -> Result<DetailedExpenses> {
    let start = day_start(start_date);
    let end = day_after(end_date);

    let all = categories.is_empty();
    let wants = |c: &str| all || categories.iter().any(|s| s == c);

    let mut response = DetailedExpenses::default();

    if wants("fuel") {
        response.fuel_records = Fuel::find()
            .filter(fuel::Column::CreatedAt.gte(start))
            .filter(fuel::Column::CreatedAt.lt(end))
            .order_by_asc(fuel::Column::CreatedAt)
            .all(db)
            .await?;
    }

    if wants("reparation") {
        response.reparation_records = Reparation::find()
            .filter(reparation::Column::RepairDate.gte(start))
            .filter(reparation::Column::RepairDate.lt(end))
            .order_by_asc(reparation::Column::RepairDate)
            .all(db)
            .await?;
    }

    if wants("maintenance") {
        response.maintenance_records = Maintenance::find()
            .filter(maintenance::Column::MaintenanceDate.gte(start))
            .filter(maintenance::Column::MaintenanceDate.lt(end))
            .order_by_asc(maintenance::Column::MaintenanceDate)
            .all(db)
            .await?;
    }

    if wants("purchases") {
        response.purchase_records = Vehicle::find()
            .filter(vehicle::Column::PurchaseDate.gte(start))
            .filter(vehicle::Column::PurchaseDate.lt(end))
            .filter(vehicle::Column::PurchasePrice.gt(0.0))
            .order_by_asc(vehicle::Column::PurchaseDate)
            .all(db)
            .await?;
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 3), (2025, 4));
        assert_eq!(prev_month(2025, 1), (2024, 12));
    }

    #[test]
    fn test_month_label_format() {
        assert_eq!(month_label(2025, 3), "Mar '25");
        assert_eq!(month_label(2024, 12), "Dec '24");
    }

    #[test]
    fn test_display_status_known_and_unknown() {
        assert_eq!(display_status("available"), "Available");
        assert_eq!(display_status("in_repair"), "In Repair");
        assert_eq!(display_status("out_of_zone"), "Out Of Zone");
    }
}
