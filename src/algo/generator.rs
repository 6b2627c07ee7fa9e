use crate::core::{
    Catalog, Curriculum, Eligibility, Gene, GroupId, LessonType, Schedule, ScheduledSubject,
    ACTIVE_TERM,
};
use rand::Rng;

/// Builds one random schedule covering every active-term requirement.
///
/// Requirements whose partition is unknown, or which have no eligible teacher
/// or room, are skipped, so the schedule may be shorter than nominal.
pub fn generate(catalog: &Catalog, rng: &mut impl Rng) -> Schedule {
    let mut schedule = Schedule::new();

    for curriculum in catalog.curricula() {
        generate_curriculum(catalog, curriculum, rng, &mut schedule);
    }

    schedule
}

fn generate_curriculum(
    catalog: &Catalog,
    curriculum: &Curriculum,
    rng: &mut impl Rng,
    schedule: &mut Schedule,
) {
    let groups: Vec<GroupId> = catalog.groups_of(curriculum.id).map(|g| g.id).collect();

    for requirement in catalog.requirements_of(curriculum.id, ACTIVE_TERM) {
        let Some(partition) = catalog.subject_partition(requirement.subject_partition_id) else {
            log::debug!(
                "Skipping requirement of {}: unknown subject partition {}",
                curriculum.name,
                requirement.subject_partition_id
            );
            continue;
        };
        let Some(eligibility) = Eligibility::of(catalog, partition) else {
            continue;
        };

        for group_ids in attendances(partition.lesson_type, requirement, &groups) {
            let Some((day_id, time_id, teacher_id, room_id)) = eligibility.sample(catalog, rng)
            else {
                continue;
            };

            schedule.push(Gene {
                group_ids,
                day_id,
                time_id,
                subject_partition_id: partition.id,
                teacher_id,
                room_id,
            });
        }
    }
}

/// Lists the attending groups of every gene a requirement expands to.
fn attendances(
    lesson_type: LessonType,
    requirement: &ScheduledSubject,
    groups: &[GroupId],
) -> Vec<Vec<GroupId>> {
    let count = requirement.count as usize;

    match lesson_type {
        LessonType::Lecture if groups.is_empty() => Vec::new(),
        LessonType::Lecture => vec![groups.to_vec(); count],
        LessonType::Practice => (0..count)
            .flat_map(|_| groups.iter().map(|&group| vec![group]))
            .collect(),
        LessonType::Laboratory => groups
            .iter()
            .flat_map(|&group| std::iter::repeat(vec![group]).take(count * 2))
            .collect(),
    }
}

/// Returns the number of genes the requirements of known partitions expand to,
/// regardless of teacher and room eligibility.
#[must_use]
pub fn nominal_length(catalog: &Catalog) -> usize {
    catalog
        .curricula()
        .iter()
        .map(|curriculum| {
            let groups: Vec<GroupId> = catalog.groups_of(curriculum.id).map(|g| g.id).collect();
            catalog
                .requirements_of(curriculum.id, ACTIVE_TERM)
                .filter_map(|requirement| {
                    catalog
                        .subject_partition(requirement.subject_partition_id)
                        .map(|partition| attendances(partition.lesson_type, requirement, &groups))
                })
                .map(|genes| genes.len())
                .sum::<usize>()
        })
        .sum()
}
