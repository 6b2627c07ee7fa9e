use super::{Room, SubjectPartition, Teacher};
use std::fmt::{Display, Formatter, Result};

/// Short teacher name, e.g. `Curie M.S.`.
pub struct TeacherName<'a>(pub &'a Teacher);

impl Display for TeacherName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let initial = |name: &str| name.chars().next().map(|c| format!("{c}.")).unwrap_or_default();
        write!(
            f,
            "{} {}{}",
            self.0.last_name,
            initial(&self.0.first_name),
            initial(&self.0.second_name)
        )
    }
}

/// Room location, e.g. `b. 2, r. 101`.
pub struct RoomName<'a>(pub &'a Room);

impl Display for RoomName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "b. {}, r. {}", self.0.building, self.0.room)
    }
}

/// Subject name annotated with its form, e.g. `Optics (lecture)`.
pub struct SubjectName<'a>(pub &'a SubjectPartition);

impl Display for SubjectName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} ({})", self.0.name, self.0.lesson_type.name())
    }
}
