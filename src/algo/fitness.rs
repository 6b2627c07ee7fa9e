use crate::core::{DayId, Gene, TimeSlotId};
use ahash::{HashSet, HashSetExt};

/// Occupancy of a resource at a given day and time slot.
type Slot = (u32, DayId, TimeSlotId);

/// Scores a schedule by counting conflicts. Zero means conflict-free.
///
/// Every gene whose teacher or room is already taken at its day and time
/// costs one point each. Groups are checked in order and marked as busy until
/// the first already busy group is found; that gene costs one point and its
/// remaining groups are neither checked nor marked.
#[must_use]
pub fn evaluate(schedule: &[Gene]) -> i64 {
    let mut teachers: HashSet<Slot> = HashSet::with_capacity(schedule.len());
    let mut rooms: HashSet<Slot> = HashSet::with_capacity(schedule.len());
    let mut groups: HashSet<Slot> = HashSet::with_capacity(schedule.len());
    let mut score = 0;

    for gene in schedule {
        if !teachers.insert((gene.teacher_id, gene.day_id, gene.time_id)) {
            score -= 1;
        }

        if !rooms.insert((gene.room_id, gene.day_id, gene.time_id)) {
            score -= 1;
        }

        for &group in &gene.group_ids {
            if !groups.insert((group, gene.day_id, gene.time_id)) {
                score -= 1;
                break;
            }
        }
    }

    score
}

#[cfg(test)]
mod test {
    use super::*;

    fn gene(groups: &[u32], day: u32, time: u32, teacher: u32, room: u32) -> Gene {
        Gene {
            group_ids: groups.to_vec(),
            day_id: day,
            time_id: time,
            subject_partition_id: 1,
            teacher_id: teacher,
            room_id: room,
        }
    }

    #[test]
    fn empty_schedule_should_be_conflict_free() {
        assert_eq!(evaluate(&[]), 0);
    }

    #[test]
    fn disjoint_genes_should_be_conflict_free() {
        let schedule = [gene(&[1], 1, 1, 1, 1), gene(&[1], 1, 2, 1, 1), gene(&[2], 1, 1, 2, 2)];
        assert_eq!(evaluate(&schedule), 0);
    }

    #[test]
    fn teacher_and_room_collisions_should_cost_a_point_each() {
        assert_eq!(evaluate(&[gene(&[1], 1, 1, 1, 1), gene(&[2], 1, 1, 1, 2)]), -1);
        assert_eq!(evaluate(&[gene(&[1], 1, 1, 1, 1), gene(&[2], 1, 1, 2, 1)]), -1);
        assert_eq!(evaluate(&[gene(&[1], 1, 1, 1, 1), gene(&[2], 1, 1, 1, 1)]), -2);
        assert_eq!(
            evaluate(&[gene(&[1], 1, 1, 1, 1), gene(&[2], 1, 1, 1, 1), gene(&[3], 1, 1, 1, 1)]),
            -4
        );
    }

    #[test]
    fn group_conflict_should_cost_one_point_per_gene() {
        let schedule = [gene(&[1, 2], 1, 1, 1, 1), gene(&[1, 2], 1, 1, 2, 2)];
        assert_eq!(evaluate(&schedule), -1);
    }

    #[test]
    fn group_check_should_stop_at_first_busy_group() {
        // Group 3 of the second gene is never marked, so the third gene does not collide.
        let schedule = [
            gene(&[1], 1, 1, 1, 1),
            gene(&[1, 3], 1, 1, 2, 2),
            gene(&[3], 1, 1, 3, 3),
        ];
        assert_eq!(evaluate(&schedule), -1);

        // Groups before the busy one are still marked.
        let schedule = [
            gene(&[2], 1, 1, 1, 1),
            gene(&[3, 2], 1, 1, 2, 2),
            gene(&[3], 1, 1, 3, 3),
        ];
        assert_eq!(evaluate(&schedule), -2);
    }

    #[test]
    fn zero_score_should_mean_no_shared_teacher_or_room_slot() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let schedule: Vec<_> = (0..4)
                .map(|i| {
                    let (day, time) = (rng.gen_range(1..=2), rng.gen_range(1..=2));
                    gene(&[i], day, time, rng.gen_range(1..=3), rng.gen_range(1..=3))
                })
                .collect();

            let score = evaluate(&schedule);
            assert!(score <= 0);

            if score == 0 {
                for (i, a) in schedule.iter().enumerate() {
                    for b in &schedule[i + 1..] {
                        let same_slot = (a.day_id, a.time_id) == (b.day_id, b.time_id);
                        assert!(!(same_slot && a.teacher_id == b.teacher_id));
                        assert!(!(same_slot && a.room_id == b.room_id));
                    }
                }
            }
        }
    }
}
