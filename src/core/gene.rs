use super::{
    Catalog, DayId, GroupId, Lesson, LessonId, RoomId, SubjectPartition, SubjectPartitionId,
    TeacherId, TimeSlotId,
};
use ahash::{HashSet, HashSetExt};
use rand::seq::SliceRandom;
use rand::Rng;

/// A single timetable decision. Several groups may share one gene (lectures).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Gene {
    pub group_ids: Vec<GroupId>,
    pub day_id: DayId,
    pub time_id: TimeSlotId,
    pub subject_partition_id: SubjectPartitionId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
}

impl Gene {
    /// Expands the gene into one lesson row per attending group.
    /// Rows are numbered from `first_id`.
    pub fn rows(&self, first_id: LessonId) -> impl Iterator<Item = Lesson> + '_ {
        (first_id..).zip(&self.group_ids).map(|(id, &group_id)| Lesson {
            id,
            group_id,
            day_id: self.day_id,
            time_id: self.time_id,
            subject_partition_id: self.subject_partition_id,
            teacher_id: self.teacher_id,
            room_id: self.room_id,
        })
    }
}

/// A full candidate timetable. Its length is fixed for a run.
pub type Schedule = Vec<Gene>;

/// Teachers and rooms a subject partition may be taught by and in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Eligibility {
    pub teachers: Vec<TeacherId>,
    pub rooms: Vec<RoomId>,
}

impl Eligibility {
    /// Resolves the eligibility of the partition with the given id.
    /// Returns `None` if the partition is unknown or has no teacher or no room.
    #[must_use]
    pub fn resolve(catalog: &Catalog, partition: SubjectPartitionId) -> Option<Self> {
        Self::of(catalog, catalog.subject_partition(partition)?)
    }

    /// Resolves the eligibility of the given partition.
    /// Allowed rooms are those present in every one of the partition's room groups.
    #[must_use]
    pub fn of(catalog: &Catalog, partition: &SubjectPartition) -> Option<Self> {
        let teachers = partition.teachers.clone();
        let rooms = intersect_room_groups(catalog, partition);

        if teachers.is_empty() || rooms.is_empty() {
            log::debug!("Subject partition {} has no eligible teacher or room", partition.id);
            None
        } else {
            Some(Self { teachers, rooms })
        }
    }

    /// Draws a teacher, a room, a day and a time slot uniformly.
    /// Returns `None` if the catalog has no days or no time slots.
    pub fn sample(
        &self,
        catalog: &Catalog,
        rng: &mut impl Rng,
    ) -> Option<(DayId, TimeSlotId, TeacherId, RoomId)> {
        let day = catalog.days().choose(rng)?.id;
        let time = catalog.times().choose(rng)?.id;
        let teacher = *self.teachers.choose(rng)?;
        let room = *self.rooms.choose(rng)?;
        Some((day, time, teacher, room))
    }
}

fn intersect_room_groups(catalog: &Catalog, partition: &SubjectPartition) -> Vec<RoomId> {
    let mut groups = partition.room_groups.iter().map(|&id| {
        catalog
            .room_group(id)
            .map(|group| group.rooms.as_slice())
            .unwrap_or_default()
    });

    let Some(first) = groups.next() else {
        return Vec::new();
    };

    let others: Vec<HashSet<RoomId>> = groups
        .map(|rooms| {
            let mut set = HashSet::with_capacity(rooms.len());
            set.extend(rooms.iter().copied());
            set
        })
        .collect();

    let mut seen = HashSet::new();
    first
        .iter()
        .copied()
        .filter(|room| others.iter().all(|rooms| rooms.contains(room)))
        .filter(|&room| seen.insert(room))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{Day, LessonType, RoomGroup, TimeSlot};

    fn partition(room_groups: Vec<u32>, teachers: Vec<u32>) -> SubjectPartition {
        SubjectPartition {
            id: 1,
            name: "Optics".into(),
            lesson_type: LessonType::Practice,
            teachers,
            room_groups,
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.room_groups = vec![
            RoomGroup { id: 1, name: "Large".into(), rooms: vec![1, 2, 3] },
            RoomGroup { id: 2, name: "Projector".into(), rooms: vec![3, 2, 4] },
            RoomGroup { id: 3, name: "Lab".into(), rooms: vec![5] },
        ];
        catalog.days = vec![Day { id: 1, name: "Monday".into() }];
        catalog.times = vec![TimeSlot { id: 7, name: "8:00-9:30".into() }];
        catalog
    }

    #[test]
    fn rooms_should_be_intersection_of_room_groups() {
        let catalog = catalog();
        let eligibility = Eligibility::of(&catalog, &partition(vec![1, 2], vec![1]));
        assert_eq!(eligibility.map(|e| e.rooms), Some(vec![2, 3]));
    }

    #[test]
    fn disjoint_room_groups_should_not_be_eligible() {
        let catalog = catalog();
        assert!(Eligibility::of(&catalog, &partition(vec![1, 3], vec![1])).is_none());
    }

    #[test]
    fn missing_teachers_or_room_groups_should_not_be_eligible() {
        let catalog = catalog();
        assert!(Eligibility::of(&catalog, &partition(vec![1], vec![])).is_none());
        assert!(Eligibility::of(&catalog, &partition(vec![], vec![1])).is_none());
        assert!(Eligibility::of(&catalog, &partition(vec![1, 9], vec![1])).is_none());
        assert!(Eligibility::resolve(&catalog, 42).is_none());
    }

    #[test]
    fn sample_should_draw_from_allowed_sets() {
        let catalog = catalog();
        let eligibility = Eligibility { teachers: vec![4], rooms: vec![9] };
        let mut rng = rand::thread_rng();
        assert_eq!(eligibility.sample(&catalog, &mut rng), Some((1, 7, 4, 9)));
        assert_eq!(eligibility.sample(&Catalog::new(), &mut rng), None);
    }

    #[test]
    fn gene_should_expand_to_row_per_group() {
        let gene = Gene {
            group_ids: vec![3, 5, 8],
            day_id: 1,
            time_id: 2,
            subject_partition_id: 4,
            teacher_id: 5,
            room_id: 6,
        };

        let rows: Vec<_> = gene.rows(10).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|row| row.id).collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(rows.iter().map(|row| row.group_id).collect::<Vec<_>>(), vec![3, 5, 8]);
        assert!(rows
            .iter()
            .all(|row| (row.day_id, row.time_id, row.teacher_id, row.room_id) == (1, 2, 5, 6)));
    }
}
