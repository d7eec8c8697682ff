use serde::{Deserialize, Serialize};

/// The five fixed workflow columns, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Backlog,
    Specification,
    Implementation,
    Test,
    Done,
}

impl ColumnId {
    pub const ALL: [ColumnId; 5] = [
        ColumnId::Backlog,
        ColumnId::Specification,
        ColumnId::Implementation,
        ColumnId::Test,
        ColumnId::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Backlog => "backlog",
            ColumnId::Specification => "specification",
            ColumnId::Implementation => "implementation",
            ColumnId::Test => "test",
            ColumnId::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ColumnId::Backlog => "Backlog",
            ColumnId::Specification => "Specification",
            ColumnId::Implementation => "Implementation",
            ColumnId::Test => "Test",
            ColumnId::Done => "Done",
        }
    }

    /// Columns that split into active/done lanes.
    pub fn has_subsections(&self) -> bool {
        matches!(self, ColumnId::Specification | ColumnId::Implementation)
    }

    pub fn allows_wip_limit(&self) -> bool {
        matches!(
            self,
            ColumnId::Specification | ColumnId::Implementation | ColumnId::Test
        )
    }

    pub fn parse(raw: &str) -> Option<ColumnId> {
        match raw {
            "backlog" => Some(ColumnId::Backlog),
            "specification" => Some(ColumnId::Specification),
            "implementation" => Some(ColumnId::Implementation),
            "test" => Some(ColumnId::Test),
            "done" => Some(ColumnId::Done),
            _ => None,
        }
    }
}

/// Lane within a two-phase column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Active,
    Done,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Active => "active",
            Section::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Active => "Active",
            Section::Done => "Done",
        }
    }

    pub fn parse(raw: &str) -> Option<Section> {
        match raw {
            "active" => Some(Section::Active),
            "done" => Some(Section::Done),
            _ => None,
        }
    }
}

/// Canonical stored status of a task, one variant per reachable
/// column/lane combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Backlog,
    SpecificationActive,
    SpecificationDone,
    ImplementationActive,
    ImplementationDone,
    Test,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 7] = [
        TaskStatus::Backlog,
        TaskStatus::SpecificationActive,
        TaskStatus::SpecificationDone,
        TaskStatus::ImplementationActive,
        TaskStatus::ImplementationDone,
        TaskStatus::Test,
        TaskStatus::Done,
    ];

    /// The exact string persisted on a task.
    pub fn canonical(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::SpecificationActive => "Specification Active",
            TaskStatus::SpecificationDone => "Specification Done",
            TaskStatus::ImplementationActive => "Implementation Active",
            TaskStatus::ImplementationDone => "Implementation Done",
            TaskStatus::Test => "Test",
            TaskStatus::Done => "Done",
        }
    }

    /// Total mapping from whatever a task carries in its status field.
    /// Comparison is case-insensitive; anything unrecognized lands in the
    /// backlog so a stray status never breaks grouping.
    pub fn from_raw(raw: &str) -> TaskStatus {
        match raw.to_lowercase().as_str() {
            "backlog" => TaskStatus::Backlog,
            "specification active" => TaskStatus::SpecificationActive,
            "specification done" => TaskStatus::SpecificationDone,
            "implementation active" => TaskStatus::ImplementationActive,
            "implementation done" => TaskStatus::ImplementationDone,
            "test" => TaskStatus::Test,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Backlog,
        }
    }

    pub fn column(&self) -> ColumnId {
        match self {
            TaskStatus::Backlog => ColumnId::Backlog,
            TaskStatus::SpecificationActive | TaskStatus::SpecificationDone => {
                ColumnId::Specification
            }
            TaskStatus::ImplementationActive | TaskStatus::ImplementationDone => {
                ColumnId::Implementation
            }
            TaskStatus::Test => ColumnId::Test,
            TaskStatus::Done => ColumnId::Done,
        }
    }

    /// Lane within the column, for the two-phase columns only.
    pub fn section(&self) -> Option<Section> {
        match self {
            TaskStatus::SpecificationActive | TaskStatus::ImplementationActive => {
                Some(Section::Active)
            }
            TaskStatus::SpecificationDone | TaskStatus::ImplementationDone => Some(Section::Done),
            _ => None,
        }
    }
}

/// A droppable target in the board UI. Simple columns expose their id
/// (`"backlog"`); two-phase columns expose `"<id>-active"` and
/// `"<id>-done"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub column: ColumnId,
    pub section: Option<Section>,
}

impl DropZone {
    pub fn parse(raw: &str) -> Option<DropZone> {
        match raw.split_once('-') {
            Some((column, section)) => Some(DropZone {
                column: ColumnId::parse(column)?,
                section: Some(Section::parse(section)?),
            }),
            None => Some(DropZone {
                column: ColumnId::parse(raw)?,
                section: None,
            }),
        }
    }

    pub fn id(&self) -> String {
        match self.section {
            Some(section) => format!("{}-{}", self.column.as_str(), section.as_str()),
            None => self.column.as_str().to_string(),
        }
    }

    /// The status a task acquires when dropped here. A sectionless drop on
    /// a two-phase column resolves to its active lane.
    pub fn status(&self) -> TaskStatus {
        match (self.column, self.section) {
            (ColumnId::Specification, Some(Section::Done)) => TaskStatus::SpecificationDone,
            (ColumnId::Specification, _) => TaskStatus::SpecificationActive,
            (ColumnId::Implementation, Some(Section::Done)) => TaskStatus::ImplementationDone,
            (ColumnId::Implementation, _) => TaskStatus::ImplementationActive,
            (ColumnId::Backlog, _) => TaskStatus::Backlog,
            (ColumnId::Test, _) => TaskStatus::Test,
            (ColumnId::Done, _) => TaskStatus::Done,
        }
    }

    /// Zone a task with this status belongs to when grouping the board.
    pub fn for_status(status: TaskStatus) -> DropZone {
        DropZone {
            column: status.column(),
            section: status.section(),
        }
    }
}
