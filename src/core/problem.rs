use serde::{Deserialize, Serialize};

pub type CurriculumId = u32;
pub type GroupId = u32;
pub type SubjectPartitionId = u32;
pub type TeacherId = u32;
pub type RoomGroupId = u32;
pub type RoomId = u32;
pub type TimeSlotId = u32;
pub type DayId = u32;
pub type TermNumberId = u32;
pub type LessonId = u32;

/// The term whose requirements are scheduled by a run.
pub const ACTIVE_TERM: TermNumberId = 0;

/// A curriculum. Owns groups and per-term requirements.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Curriculum {
    pub id: CurriculumId,
    pub name: String,
}

/// A cohort of students attending lessons together.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub curriculum_id: CurriculumId,
    pub name: String,
}

/// Form of a subject partition. Decides how many genes a requirement expands to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Lecture,
    Practice,
    Laboratory,
}

impl LessonType {
    /// Lowercase human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Practice => "practice",
            Self::Laboratory => "laboratory",
        }
    }
}

/// One teachable unit of a subject with its eligible teachers and room categories.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct SubjectPartition {
    pub id: SubjectPartitionId,
    pub name: String,
    pub lesson_type: LessonType,
    pub teachers: Vec<TeacherId>,
    pub room_groups: Vec<RoomGroupId>,
}

/// How many times a subject partition occurs per week for a curriculum in a term.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct ScheduledSubject {
    pub curriculum_id: CurriculumId,
    pub term_number_id: TermNumberId,
    pub subject_partition_id: SubjectPartitionId,
    pub count: u32,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Teacher {
    pub id: TeacherId,
    pub last_name: String,
    pub first_name: String,
    pub second_name: String,
}

/// A named category of interchangeable rooms.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct RoomGroup {
    pub id: RoomGroupId,
    pub name: String,
    pub rooms: Vec<RoomId>,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub building: String,
    pub room: String,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Day {
    pub id: DayId,
    pub name: String,
}

/// A stored lesson row. Always scoped to exactly one group.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Lesson {
    pub id: LessonId,
    pub group_id: GroupId,
    pub day_id: DayId,
    pub time_id: TimeSlotId,
    pub subject_partition_id: SubjectPartitionId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
}

/// Every entity the composer reads, plus the lesson table it replaces.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, Eq, Serialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub curricula: Vec<Curriculum>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub subject_partitions: Vec<SubjectPartition>,
    #[serde(default)]
    pub scheduled_subjects: Vec<ScheduledSubject>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub room_groups: Vec<RoomGroup>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub times: Vec<TimeSlot>,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all curricula.
    #[must_use]
    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    /// Returns the groups belonging to the given curriculum.
    pub fn groups_of(&self, curriculum: CurriculumId) -> impl Iterator<Item = &Group> {
        self.groups
            .iter()
            .filter(move |group| group.curriculum_id == curriculum)
    }

    /// Returns the requirements of the given curriculum for the given term.
    pub fn requirements_of(
        &self,
        curriculum: CurriculumId,
        term: TermNumberId,
    ) -> impl Iterator<Item = &ScheduledSubject> {
        self.scheduled_subjects.iter().filter(move |subject| {
            subject.curriculum_id == curriculum && subject.term_number_id == term
        })
    }

    #[must_use]
    pub fn subject_partition(&self, id: SubjectPartitionId) -> Option<&SubjectPartition> {
        self.subject_partitions.iter().find(|subject| subject.id == id)
    }

    #[must_use]
    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|teacher| teacher.id == id)
    }

    #[must_use]
    pub fn room_group(&self, id: RoomGroupId) -> Option<&RoomGroup> {
        self.room_groups.iter().find(|group| group.id == id)
    }

    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Returns all time slots.
    #[must_use]
    pub fn times(&self) -> &[TimeSlot] {
        &self.times
    }

    /// Returns all days.
    #[must_use]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Returns the stored lesson rows.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Returns the stored lesson rows of the given group.
    pub fn lessons_of(&self, group: GroupId) -> impl Iterator<Item = &Lesson> {
        self.lessons
            .iter()
            .filter(move |lesson| lesson.group_id == group)
    }
}
