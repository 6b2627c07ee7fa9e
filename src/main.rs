use clap::Parser;
use rand::prelude::*;
use std::num::NonZero;
use std::path::PathBuf;
use std::time::Duration;
use timetable_composer::algo::{Config, Genetic};
use timetable_composer::core::{
    Catalog, Curriculum, Day, Group, LessonType, Room, RoomGroup, ScheduledSubject,
    SubjectPartition, Teacher, TimeSlot, ACTIVE_TERM,
};
use timetable_composer::data::JsonStore;
use timetable_composer::run_store;

const TIMES: [&str; 5] = [
    "8:00-9:30",
    "9:55-11:30",
    "11:40-13:15",
    "13:55-15:30",
    "15:40-17:15",
];

const DAYS: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Application composing weekly lesson timetables.
#[derive(Debug, Parser)]
#[command(version, about)]
enum Application {
    /// Compose a timetable for a store and replace its lessons with it.
    Compose {
        /// Path to the JSON store.
        store: PathBuf,
        /// Number of schedules in every generation. At least 2.
        #[clap(short, long)]
        population_size: usize,
        /// Maximum number of generations.
        #[clap(short, long)]
        generations: usize,
        /// Probability of mutating a freshly built child, within [0, 1].
        #[clap(short, long)]
        mutation_rate: f64,
        /// Seed of the random source. Drawn from the system when omitted.
        #[clap(short, long)]
        seed: Option<u64>,
        /// Delay between progress reports in milliseconds.
        #[clap(short, long, default_value = "100")]
        interval_ms: u64,
    },
    /// Generate a random store to compose timetables for.
    Gen {
        /// Path of the store to write. An existing file is replaced.
        output: PathBuf,
        /// The number of curricula.
        #[clap(short, long, default_value = "2")]
        curricula: NonZero<u32>,
        /// The number of groups of every curriculum.
        #[clap(short, long, default_value = "3")]
        groups: NonZero<u32>,
        /// The number of subject partitions of every curriculum.
        #[clap(short = 'p', long, default_value = "6")]
        subjects: NonZero<u32>,
        /// The number of teachers.
        #[clap(short, long, default_value = "10")]
        teachers: NonZero<u32>,
        /// The number of rooms.
        #[clap(short, long, default_value = "12")]
        rooms: NonZero<u32>,
    },
}

fn gen_catalog(curricula: u32, groups: u32, subjects: u32, teachers: u32, rooms: u32) -> Catalog {
    let mut rng = thread_rng();
    let mut catalog = Catalog::new();

    catalog.times = (1..).zip(TIMES).map(|(id, name)| TimeSlot { id, name: name.into() }).collect();
    catalog.days = (1..).zip(DAYS).map(|(id, name)| Day { id, name: name.into() }).collect();
    catalog.teachers = (1..=teachers)
        .map(|id| Teacher {
            id,
            last_name: format!("Teacher{id}"),
            first_name: "Ada".into(),
            second_name: "Byron".into(),
        })
        .collect();
    catalog.rooms = (1..=rooms)
        .map(|id| Room { id, building: (id % 3 + 1).to_string(), room: (100 + id).to_string() })
        .collect();

    // Every room is a classroom, a third of them are also lecture halls or laboratories.
    let all: Vec<_> = (1..=rooms).collect();
    let halls: Vec<_> = all.iter().copied().filter(|id| id % 3 == 0).collect();
    let labs: Vec<_> = all.iter().copied().filter(|id| id % 3 == 1).collect();
    catalog.room_groups = vec![
        RoomGroup { id: 1, name: "Classroom".into(), rooms: all },
        RoomGroup { id: 2, name: "Lecture hall".into(), rooms: halls },
        RoomGroup { id: 3, name: "Laboratory".into(), rooms: labs },
    ];

    let teacher_ids: Vec<_> = (1..=teachers).collect();
    let mut partition_id = 1;
    for curriculum_id in 1..=curricula {
        catalog.curricula.push(Curriculum { id: curriculum_id, name: format!("Curriculum {curriculum_id}") });
        catalog.groups.extend((1..=groups).map(|number| Group {
            id: (curriculum_id - 1) * groups + number,
            curriculum_id,
            name: format!("{curriculum_id}-{number}"),
        }));

        for _ in 0..subjects {
            let (lesson_type, room_group) = match rng.gen_range(0..3) {
                0 => (LessonType::Lecture, 2),
                1 => (LessonType::Practice, 1),
                _ => (LessonType::Laboratory, 3),
            };
            let amount = rng.gen_range(1..=3.min(teacher_ids.len()));

            catalog.subject_partitions.push(SubjectPartition {
                id: partition_id,
                name: format!("Subject {partition_id}"),
                lesson_type,
                teachers: teacher_ids.choose_multiple(&mut rng, amount).copied().collect(),
                room_groups: vec![1, room_group],
            });
            catalog.scheduled_subjects.push(ScheduledSubject {
                curriculum_id,
                term_number_id: ACTIVE_TERM,
                subject_partition_id: partition_id,
                count: rng.gen_range(1..=2),
            });
            partition_id += 1;
        }
    }

    catalog
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Application::parse() {
        Application::Compose {
            store,
            population_size,
            generations,
            mutation_rate,
            seed,
            interval_ms,
        } => {
            let config = Config::new(population_size, generations, mutation_rate)?;
            let genetic = seed.map_or_else(
                || Genetic::from_entropy(config),
                |seed| Genetic::new(config, seed),
            );

            let interval = Duration::from_millis(interval_ms);
            let completion = run_store(&store, genetic, interval, |message| println!("{message}"))?;

            let seconds = completion.duration.as_secs_f64();
            completion
                .result
                .map(|_| println!("Schedule composed in {seconds:.2} sec"))
                .map_err(|err| err.context(format!("Composing failed after {seconds:.2} sec")))
        }
        Application::Gen {
            output,
            curricula,
            groups,
            subjects,
            teachers,
            rooms,
        } => {
            let catalog = gen_catalog(
                curricula.get(),
                groups.get(),
                subjects.get(),
                teachers.get(),
                rooms.get(),
            );
            let store = JsonStore::create(output, catalog)?;
            println!("Store written to {}", store.path().display());
            Ok(())
        }
    }
}
