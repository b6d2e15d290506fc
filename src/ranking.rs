use crate::models::Task;

/// One ranking row: a task name with its accumulated time investment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub task_name: String,
    /// Summed minutes across all completed occurrences.
    pub total_duration: u32,
    /// How many completed occurrences contributed.
    pub count: usize,
}

/// Ranks distinct completed-task names by cumulative duration and
/// returns the top 5.
///
/// Only tasks that are completed and carry a positive duration qualify.
/// Names are grouped by exact, case-sensitive equality; the sort is
/// stable, so ties keep first-seen order.
pub fn calculate_task_ranking(tasks: &[Task]) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = Vec::new();

    for task in tasks {
        let Some(duration) = task.duration else { continue };
        if !task.completed || duration == 0 {
            continue;
        }
        if let Some(entry) = entries.iter_mut().find(|e| e.task_name == task.text) {
            entry.total_duration += duration;
            entry.count += 1;
        } else {
            entries.push(RankingEntry {
                task_name: task.text.clone(),
                total_duration: duration,
                count: 1,
            });
        }
    }

    entries.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));
    entries.truncate(5);
    entries
}
