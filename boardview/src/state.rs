use serde::ser::{Serialize, SerializeMap, Serializer};

use flowboard_atoms::boards::{ColumnId, DropZone, Section, TaskStatus};
use flowboard_atoms::tasks::Task;

/// Tasks of one board, bucketed the way the columns render them: one lane
/// per simple column, separate active and done lanes for the two-phase
/// columns. Order within a lane is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTasks {
    backlog: Vec<Task>,
    specification: TwoPhase,
    implementation: TwoPhase,
    test: Vec<Task>,
    done: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TwoPhase {
    active: Vec<Task>,
    done: Vec<Task>,
}

impl GroupedTasks {
    /// Buckets tasks by their stored status. Unrecognized statuses group to
    /// the backlog, so a stray value never loses a card.
    pub fn from_tasks(tasks: Vec<Task>) -> GroupedTasks {
        let mut grouped = GroupedTasks::default();
        for task in tasks {
            let zone = DropZone::for_status(TaskStatus::from_raw(&task.status));
            grouped.lane_mut(zone).push(task);
        }
        grouped
    }

    pub fn lane(&self, zone: DropZone) -> &[Task] {
        match (zone.column, zone.section) {
            (ColumnId::Backlog, _) => &self.backlog,
            (ColumnId::Specification, Some(Section::Done)) => &self.specification.done,
            (ColumnId::Specification, _) => &self.specification.active,
            (ColumnId::Implementation, Some(Section::Done)) => &self.implementation.done,
            (ColumnId::Implementation, _) => &self.implementation.active,
            (ColumnId::Test, _) => &self.test,
            (ColumnId::Done, _) => &self.done,
        }
    }

    // Sectionless lookups on a two-phase column resolve to its active lane,
    // mirroring DropZone::status.
    fn lane_mut(&mut self, zone: DropZone) -> &mut Vec<Task> {
        match (zone.column, zone.section) {
            (ColumnId::Backlog, _) => &mut self.backlog,
            (ColumnId::Specification, Some(Section::Done)) => &mut self.specification.done,
            (ColumnId::Specification, _) => &mut self.specification.active,
            (ColumnId::Implementation, Some(Section::Done)) => &mut self.implementation.done,
            (ColumnId::Implementation, _) => &mut self.implementation.active,
            (ColumnId::Test, _) => &mut self.test,
            (ColumnId::Done, _) => &mut self.done,
        }
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.iter().find(|t| t.task_id == task_id)
    }

    /// Lane a task currently sits in.
    pub fn zone_of(&self, task_id: &str) -> Option<DropZone> {
        for status in TaskStatus::ALL {
            let zone = DropZone::for_status(status);
            if self.lane(zone).iter().any(|t| t.task_id == task_id) {
                return Some(zone);
            }
        }
        None
    }

    pub fn position(&self, zone: DropZone, task_id: &str) -> Option<usize> {
        self.lane(zone).iter().position(|t| t.task_id == task_id)
    }

    /// Removes a task from one specific lane. Returns `None` when the task
    /// is not there, leaving every lane untouched.
    pub fn take(&mut self, zone: DropZone, task_id: &str) -> Option<Task> {
        let lane = self.lane_mut(zone);
        let idx = lane.iter().position(|t| t.task_id == task_id)?;
        Some(lane.remove(idx))
    }

    /// Inserts at `index` within the lane, clamped to the lane's length.
    pub fn insert(&mut self, zone: DropZone, index: usize, task: Task) {
        let lane = self.lane_mut(zone);
        let index = index.min(lane.len());
        lane.insert(index, task);
    }

    pub fn push_backlog(&mut self, task: Task) {
        self.backlog.push(task);
    }

    /// Overwrites the stored copy of a task in place, wherever it sits.
    pub fn replace(&mut self, task: Task) -> bool {
        for status in TaskStatus::ALL {
            let lane = self.lane_mut(DropZone::for_status(status));
            if let Some(idx) = lane.iter().position(|t| t.task_id == task.task_id) {
                lane[idx] = task;
                return true;
            }
        }
        false
    }

    /// Removes a task from whichever lane holds it.
    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        for status in TaskStatus::ALL {
            if let Some(task) = self.take(DropZone::for_status(status), task_id) {
                return Some(task);
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        TaskStatus::ALL
            .iter()
            .flat_map(|status| self.lane(DropZone::for_status(*status)).iter())
    }

    pub fn len(&self) -> usize {
        TaskStatus::ALL
            .iter()
            .map(|status| self.lane(DropZone::for_status(*status)).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializes as a map keyed by drop-zone id ("backlog",
/// "specification-active", ...), the shape the board screen renders from.
impl Serialize for GroupedTasks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TaskStatus::ALL.len()))?;
        for status in TaskStatus::ALL {
            let zone = DropZone::for_status(status);
            map.serialize_entry(&zone.id(), self.lane(zone))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: &str) -> Task {
        Task {
            task_id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            status: status.to_string(),
            color: "#ff9aa2".to_string(),
            assigned_to: None,
            created_at: "2026-01-05T09:00:00+00:00".to_string(),
        }
    }

    fn zone(raw: &str) -> DropZone {
        DropZone::parse(raw).unwrap()
    }

    fn ids(lane: &[Task]) -> Vec<&str> {
        lane.iter().map(|t| t.task_id.as_str()).collect()
    }

    #[test]
    fn groups_tasks_by_status_into_their_lanes() {
        let grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Backlog"),
            task("t-2", "Specification Active"),
            task("t-3", "Specification Done"),
            task("t-4", "Implementation Active"),
            task("t-5", "Implementation Done"),
            task("t-6", "Test"),
            task("t-7", "Done"),
        ]);
        assert_eq!(ids(grouped.lane(zone("backlog"))), ["t-1"]);
        assert_eq!(ids(grouped.lane(zone("specification-active"))), ["t-2"]);
        assert_eq!(ids(grouped.lane(zone("specification-done"))), ["t-3"]);
        assert_eq!(ids(grouped.lane(zone("implementation-active"))), ["t-4"]);
        assert_eq!(ids(grouped.lane(zone("implementation-done"))), ["t-5"]);
        assert_eq!(ids(grouped.lane(zone("test"))), ["t-6"]);
        assert_eq!(ids(grouped.lane(zone("done"))), ["t-7"]);
        assert_eq!(grouped.len(), 7);
    }

    #[test]
    fn unknown_statuses_land_in_the_backlog() {
        let grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "someday"),
            task("t-2", ""),
            task("t-3", "Backlog"),
        ]);
        assert_eq!(ids(grouped.lane(zone("backlog"))), ["t-1", "t-2", "t-3"]);
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn lane_order_follows_arrival_order() {
        let grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Test"),
            task("t-2", "Test"),
            task("t-3", "Test"),
        ]);
        assert_eq!(ids(grouped.lane(zone("test"))), ["t-1", "t-2", "t-3"]);
    }

    #[test]
    fn sectionless_lookup_on_a_two_phase_column_reads_the_active_lane() {
        let grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Specification Active"),
            task("t-2", "Specification Done"),
        ]);
        let sectionless = DropZone {
            column: ColumnId::Specification,
            section: None,
        };
        assert_eq!(ids(grouped.lane(sectionless)), ["t-1"]);
    }

    #[test]
    fn insert_clamps_the_index_to_the_lane_length() {
        let mut grouped = GroupedTasks::from_tasks(vec![task("t-1", "Done")]);
        grouped.insert(zone("done"), 99, task("t-2", "Done"));
        assert_eq!(ids(grouped.lane(zone("done"))), ["t-1", "t-2"]);

        grouped.insert(zone("done"), 0, task("t-3", "Done"));
        assert_eq!(ids(grouped.lane(zone("done"))), ["t-3", "t-1", "t-2"]);
    }

    #[test]
    fn take_only_looks_in_the_named_lane() {
        let mut grouped = GroupedTasks::from_tasks(vec![task("t-1", "Test")]);
        assert!(grouped.take(zone("backlog"), "t-1").is_none());
        assert_eq!(grouped.len(), 1);

        let taken = grouped.take(zone("test"), "t-1").unwrap();
        assert_eq!(taken.task_id, "t-1");
        assert!(grouped.is_empty());
    }

    #[test]
    fn replace_keeps_the_position_and_lane() {
        let mut grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Implementation Active"),
            task("t-2", "Implementation Active"),
        ]);
        let mut edited = task("t-1", "Implementation Active");
        edited.title = "Renamed".to_string();
        assert!(grouped.replace(edited));

        let lane = grouped.lane(zone("implementation-active"));
        assert_eq!(ids(lane), ["t-1", "t-2"]);
        assert_eq!(lane[0].title, "Renamed");
    }

    #[test]
    fn replace_of_an_unknown_task_reports_false() {
        let mut grouped = GroupedTasks::default();
        assert!(!grouped.replace(task("ghost", "Backlog")));
    }

    #[test]
    fn remove_searches_every_lane() {
        let mut grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Backlog"),
            task("t-2", "Implementation Done"),
        ]);
        let removed = grouped.remove("t-2").unwrap();
        assert_eq!(removed.status, "Implementation Done");
        assert!(grouped.remove("t-2").is_none());
        assert_eq!(grouped.len(), 1);
    }

    #[test]
    fn zone_of_reports_the_current_lane() {
        let grouped = GroupedTasks::from_tasks(vec![task("t-1", "Specification Done")]);
        assert_eq!(grouped.zone_of("t-1"), Some(zone("specification-done")));
        assert_eq!(grouped.zone_of("ghost"), None);
    }

    #[test]
    fn serializes_as_a_zone_keyed_map() {
        let grouped = GroupedTasks::from_tasks(vec![
            task("t-1", "Backlog"),
            task("t-2", "Specification Active"),
        ]);
        let json = serde_json::to_value(&grouped).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 7);
        for key in [
            "backlog",
            "specification-active",
            "specification-done",
            "implementation-active",
            "implementation-done",
            "test",
            "done",
        ] {
            assert!(object.contains_key(key), "missing zone {}", key);
        }
        assert_eq!(json["backlog"][0]["id"], "t-1");
        assert_eq!(json["specification-active"][0]["id"], "t-2");
        assert_eq!(json["implementation-done"].as_array().unwrap().len(), 0);
    }
}
