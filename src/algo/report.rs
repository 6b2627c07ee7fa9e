use crate::core::{Catalog, Day, Gene, Group, RoomName, SubjectName, TeacherName, TimeSlot};
use std::fmt::{Display, Formatter, Result};

/// Human-readable timetable: curriculum, group, day, time slot, then the lesson.
pub struct Breakdown<'a> {
    catalog: &'a Catalog,
    schedule: &'a [Gene],
}

impl<'a> Breakdown<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog, schedule: &'a [Gene]) -> Self {
        Self { catalog, schedule }
    }

    fn write_day(&self, f: &mut Formatter<'_>, group: &Group, day: &Day) -> Result {
        writeln!(f, "      {}", day.name)?;
        for time in self.catalog.times() {
            let lessons = self.schedule.iter().filter(|gene| {
                gene.day_id == day.id
                    && gene.time_id == time.id
                    && gene.group_ids.contains(&group.id)
            });
            for gene in lessons {
                self.write_lesson(f, time, gene)?;
            }
        }
        Ok(())
    }

    fn write_lesson(&self, f: &mut Formatter<'_>, time: &TimeSlot, gene: &Gene) -> Result {
        let subject = self.catalog.subject_partition(gene.subject_partition_id);
        let teacher = self.catalog.teacher(gene.teacher_id);
        let room = self.catalog.room(gene.room_id);

        let (Some(subject), Some(teacher), Some(room)) = (subject, teacher, room) else {
            return Ok(());
        };

        writeln!(
            f,
            "         {}: {}, {}, {}",
            time.name,
            SubjectName(subject),
            TeacherName(teacher),
            RoomName(room)
        )
    }
}

impl Display for Breakdown<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for curriculum in self.catalog.curricula() {
            writeln!(f, "{}", curriculum.name)?;
            for group in self.catalog.groups_of(curriculum.id) {
                writeln!(f, "   gr. {}", group.name)?;
                for day in self.catalog.days() {
                    self.write_day(f, group, day)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
