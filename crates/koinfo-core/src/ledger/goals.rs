//! Goal registry

use chrono::NaiveDate;
use tracing::info;

use super::{fold_name, parse_date};
use crate::error::{Error, Result};
use crate::models::{new_id, Dataset, Goal, GoalPatch, NewGoal};

const DEFAULT_GOAL_NAME: &str = "New Goal";

/// Deadlines must fall strictly after today
fn check_deadline(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    if raw.trim().is_empty() {
        return Err(Error::Validation("Deadline required".to_string()));
    }
    let deadline = parse_date("deadline", raw)?;
    if deadline <= today {
        return Err(Error::Validation("Deadline must be after today".to_string()));
    }
    Ok(deadline)
}

fn check_target(target: f64) -> Result<f64> {
    if target.is_finite() {
        Ok(target)
    } else {
        Err(Error::Validation("Invalid target".to_string()))
    }
}

impl Dataset {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    fn goal_name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        let folded = fold_name(name);
        self.goals
            .iter()
            .filter(|g| Some(g.id.as_str()) != exclude_id)
            .any(|g| fold_name(&g.name) == folded)
    }

    /// Create a goal together with its linked saving category
    ///
    /// Progress always starts at zero and only moves through transactions.
    pub fn create_goal(&mut self, req: NewGoal, today: NaiveDate) -> Result<Goal> {
        let name = match req.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_GOAL_NAME.to_string(),
        };
        let deadline = check_deadline(req.deadline.as_deref().unwrap_or(""), today)?;
        if self.goal_name_taken(&name, None) {
            return Err(Error::duplicate("Goal", name));
        }

        let mut goal = Goal {
            id: new_id(),
            name,
            target: check_target(req.target.unwrap_or(0.0))?,
            current: 0.0,
            deadline,
            created: today,
            linked_category_id: None,
        };
        self.ensure_linked_category(&mut goal);
        self.goals.push(goal.clone());

        info!(id = %goal.id, name = %goal.name, target = goal.target, deadline = %goal.deadline, "Created goal");
        Ok(goal)
    }

    /// Update a goal and resync its linked category
    pub fn update_goal(&mut self, id: &str, patch: GoalPatch, today: NaiveDate) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("goal {}", id)))?;
        let mut goal = self.goals[index].clone();

        if let Some(raw) = patch.name.as_deref() {
            let name = raw.trim();
            if name.is_empty() {
                return Err(Error::Validation("Goal name required".to_string()));
            }
            if fold_name(name) != fold_name(&goal.name) && self.goal_name_taken(name, Some(id)) {
                return Err(Error::duplicate("Goal", name));
            }
            goal.name = name.to_string();
        }
        if let Some(target) = patch.target {
            goal.target = check_target(target)?;
        }
        if let Some(raw) = patch.deadline.as_deref() {
            goal.deadline = check_deadline(raw, today)?;
        }

        self.ensure_linked_category(&mut goal);
        self.goals[index] = goal.clone();

        info!(id = %goal.id, name = %goal.name, target = goal.target, deadline = %goal.deadline, "Updated goal");
        Ok(goal)
    }

    /// Delete a goal and soft-delete its linked category
    pub fn delete_goal(&mut self, id: &str) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("goal {}", id)))?;

        let goal = self.goals.remove(index);
        self.retire_linked_category(goal.linked_category_id.as_deref());

        info!(id = %goal.id, name = %goal.name, "Deleted goal");
        Ok(goal)
    }
}
