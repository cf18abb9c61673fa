use anyhow::{anyhow, Result};

use super::{unix_now, CalculationId, Database, UserKey};
use crate::calc::{Deduction, DeductionKind, LengthUnit, Plan, RoomReport, RoomShape};

#[derive(sqlx::FromRow)]
struct CalculationRow {
    id: i64,
    shape: String,
    unit: String,
    length: Option<f64>,
    width: Option<f64>,
    diameter: Option<f64>,
    height: Option<f64>,
    floor_area: f64,
    perimeter: f64,
    wall_area: Option<f64>,
    volume: Option<f64>,
    created_at: i64,
}

#[derive(sqlx::FromRow)]
struct DeductionRow {
    kind: String,
    length: f64,
    width: f64,
    area: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedCalculation {
    pub id: CalculationId,
    pub created_at: i64,
    pub report: RoomReport,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct CalculationSummary {
    pub id: i64,
    pub shape: String,
    pub floor_area: f64,
    pub net_wall_area: Option<f64>,
    pub created_at: i64,
}

impl CalculationRow {
    fn into_report(self, deductions: Vec<Deduction>) -> Result<SavedCalculation> {
        let shape = RoomShape::from_code(&self.shape)
            .ok_or_else(|| anyhow!("unknown room shape {:?}", self.shape))?;
        let unit = LengthUnit::from_code(&self.unit)
            .ok_or_else(|| anyhow!("unknown length unit {:?}", self.unit))?;
        let plan = match (self.diameter, self.length, self.width) {
            (Some(diameter), _, _) => Plan::Circle { diameter },
            (None, Some(length), Some(width)) => Plan::Rectangle { length, width },
            _ => return Err(anyhow!("calculation {} has no dimensions", self.id)),
        };
        Ok(SavedCalculation {
            id: CalculationId(self.id),
            created_at: self.created_at,
            report: RoomReport {
                shape,
                unit,
                plan,
                height: self.height,
                floor_area: self.floor_area,
                perimeter: self.perimeter,
                wall_area: self.wall_area,
                volume: self.volume,
                deductions,
            },
        })
    }
}

impl Database {
    /// Persist a finished room calculation with its deductions.
    pub async fn save_calculation(&self, user: UserKey, report: &RoomReport) -> Result<CalculationId> {
        let (length, width, diameter) = match report.plan {
            Plan::Rectangle { length, width } => (Some(length), Some(width), None),
            Plan::Circle { diameter } => (None, None, Some(diameter)),
        };

        let mut tx = self.pool().begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO calculations \
             (user_id, shape, unit, length, width, diameter, height, floor_area, perimeter, \
              wall_area, volume, deducted_area, net_wall_area, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user.as_i64())
        .bind(report.shape.code())
        .bind(report.unit.code())
        .bind(length)
        .bind(width)
        .bind(diameter)
        .bind(report.height)
        .bind(report.floor_area)
        .bind(report.perimeter)
        .bind(report.wall_area)
        .bind(report.volume)
        .bind(report.deducted_area())
        .bind(report.net_wall_area())
        .bind(unix_now())
        .fetch_one(&mut *tx)
        .await?;

        for deduction in &report.deductions {
            sqlx::query(
                "INSERT INTO deductions (calculation_id, kind, length, width, area) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(deduction.kind.code())
            .bind(deduction.length)
            .bind(deduction.width)
            .bind(deduction.area)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(
            user = user.0,
            calculation_id = id,
            deductions = report.deductions.len(),
            "Saved calculation"
        );
        Ok(CalculationId(id))
    }

    pub async fn get_calculation(&self, user: UserKey, id: CalculationId) -> Result<Option<SavedCalculation>> {
        tracing::trace!(user = user.0, calculation_id = id.0, "Fetching calculation");
        let row = sqlx::query_as::<_, CalculationRow>(
            "SELECT id, shape, unit, length, width, diameter, height, floor_area, perimeter, \
             wall_area, volume, created_at FROM calculations WHERE id = ? AND user_id = ?",
        )
        .bind(id.0)
        .bind(user.as_i64())
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let deductions = sqlx::query_as::<_, DeductionRow>(
            "SELECT kind, length, width, area FROM deductions WHERE calculation_id = ? ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(|d| {
            let kind = DeductionKind::from_code(&d.kind)
                .ok_or_else(|| anyhow!("unknown deduction kind {:?}", d.kind))?;
            Ok(Deduction {
                kind,
                length: d.length,
                width: d.width,
                area: d.area,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        row.into_report(deductions).map(Some)
    }

    /// Returns whether a calculation was deleted. Deductions go with it.
    pub async fn delete_calculation(&self, user: UserKey, id: CalculationId) -> Result<bool> {
        tracing::debug!(user = user.0, calculation_id = id.0, "Deleting calculation");
        let result = sqlx::query("DELETE FROM calculations WHERE id = ? AND user_id = ?")
            .bind(id.0)
            .bind(user.as_i64())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Most recent calculations first.
    pub async fn list_calculations(&self, user: UserKey, limit: i64) -> Result<Vec<CalculationSummary>> {
        tracing::trace!(user = user.0, limit, "Listing calculations");
        sqlx::query_as(
            "SELECT id, shape, floor_area, net_wall_area, created_at FROM calculations \
             WHERE user_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(user.as_i64())
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }
}
