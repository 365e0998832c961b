//! Schedule generation from a `ScheduleConfig`.
//!
//! Content is synthesized from fixed per-level templates: ten subtopics that
//! cycle across days and six task titles that cycle within a day. Generation is
//! deterministic apart from the ids and the start date.

use chrono::{Duration, Local, NaiveDate};
use tracing::info;

use crate::fields::Level;
use crate::schedule::{Schedule, ScheduleConfig, StudyDay};
use crate::task::{new_id, Task};

pub const MIN_TASKS_PER_DAY: usize = 3;
pub const MAX_TASKS_PER_DAY: usize = 6;

/// Appended to every task title when the pomodoro option is on.
pub const POMODORO_SUFFIX: &str = " (25min + 5min pausa)";

const BEGINNER_SUBTOPICS: [&str; 10] = [
    "Introdução a {topic}",
    "Conceitos fundamentais",
    "Terminologia essencial",
    "Primeiros passos práticos",
    "Fundamentos básicos",
    "Exercícios iniciais",
    "Prática guiada",
    "Consolidação do básico",
    "Revisão dos fundamentos",
    "Preparação para próximo nível",
];

const INTERMEDIATE_SUBTOPICS: [&str; 10] = [
    "Visão geral e objetivos de {topic}",
    "Conceitos intermediários",
    "Técnicas avançadas básicas",
    "Prática aplicada",
    "Resolução de problemas",
    "Projeto prático 1",
    "Análise de casos",
    "Projeto prático 2",
    "Integração de conhecimentos",
    "Revisão e consolidação",
];

const ADVANCED_SUBTOPICS: [&str; 10] = [
    "Domínio avançado de {topic}",
    "Técnicas especializadas",
    "Otimização e performance",
    "Casos complexos",
    "Projeto avançado",
    "Pesquisa e inovação",
    "Aplicações reais",
    "Mentoria e ensino",
    "Revisão profunda",
    "Avaliação final",
];

const BEGINNER_TASKS: [&str; 6] = [
    "Ler material introdutório",
    "Assistir vídeo explicativo",
    "Fazer anotações principais",
    "Resolver exercícios básicos",
    "Revisar conceitos",
    "Praticar com exemplos",
];

const INTERMEDIATE_TASKS: [&str; 6] = [
    "Estudar teoria avançada",
    "Analisar exemplos práticos",
    "Resolver problemas moderados",
    "Criar resumo do tópico",
    "Aplicar em mini-projeto",
    "Revisar e refinar",
];

const ADVANCED_TASKS: [&str; 6] = [
    "Pesquisar material especializado",
    "Analisar casos complexos",
    "Desenvolver solução original",
    "Documentar aprendizados",
    "Aplicar em projeto real",
    "Avaliar e otimizar",
];

fn subtopic_templates(level: Level) -> &'static [&'static str; 10] {
    match level {
        Level::Beginner => &BEGINNER_SUBTOPICS,
        Level::Intermediate => &INTERMEDIATE_SUBTOPICS,
        Level::Advanced => &ADVANCED_SUBTOPICS,
    }
}

fn task_templates(level: Level) -> &'static [&'static str; 6] {
    match level {
        Level::Beginner => &BEGINNER_TASKS,
        Level::Intermediate => &INTERMEDIATE_TASKS,
        Level::Advanced => &ADVANCED_TASKS,
    }
}

/// Title of day `index` (0-based) for a topic at a level.
pub fn subtopic_for_day(topic: &str, level: Level, index: usize) -> String {
    let templates = subtopic_templates(level);
    templates[index % templates.len()].replace("{topic}", topic)
}

/// `clamp(floor(hours * 1.5), 3, 6)`.
pub fn tasks_per_day(hours_per_day: f64) -> usize {
    let raw = (hours_per_day * 1.5).floor();
    if raw.is_nan() || raw < MIN_TASKS_PER_DAY as f64 {
        MIN_TASKS_PER_DAY
    } else {
        (raw as usize).min(MAX_TASKS_PER_DAY)
    }
}

fn generate_tasks(config: &ScheduleConfig) -> Vec<Task> {
    let templates = task_templates(config.level);
    (0..tasks_per_day(config.hours_per_day))
        .map(|j| {
            let base = templates[j % templates.len()];
            if config.use_pomodoro {
                Task::new(format!("{base}{POMODORO_SUFFIX}"))
            } else {
                Task::new(base)
            }
        })
        .collect()
}

/// Generate a schedule whose first day is today.
pub fn generate_schedule(config: &ScheduleConfig) -> Schedule {
    generate_schedule_from(config, Local::now().date_naive())
}

/// Generate a schedule whose first day is `start`.
pub fn generate_schedule_from(config: &ScheduleConfig, start: NaiveDate) -> Schedule {
    let days: Vec<StudyDay> = (0..config.total_days as usize)
        .map(|i| StudyDay {
            id: new_id(),
            day_number: i + 1,
            date: start + Duration::days(i as i64),
            title: subtopic_for_day(&config.topic, config.level, i),
            duration: config.hours_per_day,
            tasks: generate_tasks(config),
            scheduled_time: None,
            notes: None,
            enriched_content: None,
        })
        .collect();

    let schedule = Schedule {
        id: new_id(),
        config: config.clone(),
        days,
    };
    info!(
        schedule = %schedule.id,
        topic = %config.topic,
        days = schedule.days.len(),
        tasks = schedule.task_count(),
        "generated schedule"
    );
    schedule
}
