//! Bit-encoded, self-repairing schedule chromosome.
//!
//! # Encoding
//!
//! Each cell's course id is a fixed-width binary field of
//! `genes_per_course = ceil(log2(course_count + 1))` bits; fields are
//! concatenated in row-major (time slot, then classroom) order. The
//! canonical state of a chromosome is the decoded schedule matrix — the
//! bit genome is a derived view used by the genetic operators
//! ([`encode`]/[`decode`]), not the source of truth.
//!
//! # Repair
//!
//! Genetic operators routinely produce invalid intermediate states: a bit
//! flip can yield a course id above `course_count`, and crossover or
//! random construction can duplicate a course within a time slot.
//! [`repair`] deterministically zeroes out-of-range ids and every
//! per-slot duplicate beyond the first. It never fails, and running it on
//! an already-repaired schedule is a no-op.
//!
//! # Reference
//! Russell & Norvig (2010), "Artificial Intelligence: A Modern Approach", Ch. 4.1.4

use rand::Rng;

use crate::evaluator::Evaluator;
use crate::models::{Problem, Solution};

/// Bits needed to represent every course id `0..=course_count`.
pub fn genes_per_course(course_count: usize) -> usize {
    (usize::BITS - course_count.leading_zeros()) as usize
}

/// Bits spanned by one whole time slot row.
pub fn genes_per_timeslot(problem: &Problem) -> usize {
    problem.classroom_count() * genes_per_course(problem.course_count())
}

/// Encodes a schedule into its bit genome.
///
/// Cell values must not exceed `course_count`; higher bits would be
/// truncated by the fixed field width.
pub fn encode(problem: &Problem, schedule: &Solution) -> Vec<bool> {
    let width = genes_per_course(problem.course_count());
    let mut genome =
        Vec::with_capacity(problem.timeslots_count() * problem.classroom_count() * width);
    for slot in schedule.timeslots() {
        for &course in slot {
            for bit in (0..width).rev() {
                genome.push((course >> bit) & 1 == 1);
            }
        }
    }
    genome
}

/// Decodes a bit genome back into a schedule matrix.
///
/// Decoded values are kept verbatim, including ids above `course_count`
/// that a mutation may have produced; [`repair`] removes those.
pub fn decode(problem: &Problem, genome: &[bool]) -> Solution {
    let width = genes_per_course(problem.course_count());
    let classrooms = problem.classroom_count();
    let mut schedule = Solution::new(problem.timeslots_count(), classrooms);
    for t in 0..problem.timeslots_count() {
        for cl in 0..classrooms {
            let base = (t * classrooms + cl) * width;
            let mut course = 0usize;
            for g in 0..width {
                course = course * 2 + usize::from(genome[base + g]);
            }
            schedule.set(t, cl, course);
        }
    }
    schedule
}

/// Restores the chromosome invariants on a decoded schedule.
///
/// Zeroes every cell holding an id above `course_count`, then, within
/// each time slot, keeps only the first occurrence of each course and
/// zeroes later duplicates. Idempotent.
pub fn repair(problem: &Problem, schedule: &mut Solution) {
    let course_count = problem.course_count();
    let mut in_slot = vec![false; course_count];
    for t in 0..schedule.timeslots_count() {
        in_slot.fill(false);
        for cl in 0..schedule.classroom_count() {
            let course = schedule.get(t, cl);
            if course > course_count {
                schedule.set(t, cl, 0);
            } else if course > 0 {
                if in_slot[course - 1] {
                    schedule.set(t, cl, 0);
                } else {
                    in_slot[course - 1] = true;
                }
            }
        }
    }
}

/// One member of the genetic population.
///
/// Holds the canonical decoded schedule and its cached fitness; both are
/// kept consistent by re-running repair and fitness after every operator.
#[derive(Debug, Clone)]
pub struct Chromosome {
    schedule: Solution,
    fitness: i64,
}

impl Chromosome {
    /// Builds a random chromosome.
    ///
    /// Walks the cells in order assigning random courses with remaining
    /// required lectures and stops once every count is exhausted, leaving
    /// later cells empty. The result is repaired before fitness is cached.
    pub fn random<R: Rng>(evaluator: &Evaluator<'_>, rng: &mut R) -> Self {
        let problem = evaluator.problem();
        let mut schedule = Solution::new(problem.timeslots_count(), problem.classroom_count());
        let mut remaining: Vec<usize> = problem.lectures_per_course().to_vec();
        let mut open_courses = remaining.iter().filter(|&&n| n > 0).count();

        'cells: for t in 0..problem.timeslots_count() {
            for cl in 0..problem.classroom_count() {
                if open_courses == 0 {
                    break 'cells;
                }
                let course = loop {
                    let candidate = rng.random_range(1..=problem.course_count());
                    if remaining[candidate - 1] > 0 {
                        break candidate;
                    }
                };
                schedule.set(t, cl, course);
                remaining[course - 1] -= 1;
                if remaining[course - 1] == 0 {
                    open_courses -= 1;
                }
            }
        }

        Self::from_schedule(schedule, evaluator)
    }

    /// Builds an offspring by single-point crossover.
    ///
    /// The crossover point is aligned to a whole-time-slot boundary, so
    /// every slot row is inherited intact from exactly one parent; a
    /// parent's per-slot feasibility therefore carries over. The offspring
    /// is still repaired for the lecture-count side and as a safety net.
    pub fn offspring<R: Rng>(
        x: &Self,
        y: &Self,
        evaluator: &Evaluator<'_>,
        rng: &mut R,
    ) -> Self {
        let problem = evaluator.problem();
        let genome_len =
            problem.timeslots_count() * problem.classroom_count()
                * genes_per_course(problem.course_count());
        let cut_slot = rng.random_range(0..genome_len) / genes_per_timeslot(problem);

        let mut matrix = Vec::with_capacity(problem.timeslots_count());
        for t in 0..problem.timeslots_count() {
            let parent = if t < cut_slot { x } else { y };
            matrix.push(parent.schedule.timeslot(t).to_vec());
        }
        Self::from_schedule(Solution::from_matrix(matrix), evaluator)
    }

    /// Flips one uniformly random bit of the genome, then repairs.
    pub fn mutate<R: Rng>(&mut self, evaluator: &Evaluator<'_>, rng: &mut R) {
        let problem = evaluator.problem();
        let width = genes_per_course(problem.course_count());
        let classrooms = problem.classroom_count();
        let genome_len = problem.timeslots_count() * classrooms * width;

        let gene = rng.random_range(0..genome_len);
        let cell = gene / width;
        let bit = gene % width;
        let (t, cl) = (cell / classrooms, cell % classrooms);

        let course = self.schedule.get(t, cl) ^ (1 << (width - 1 - bit));
        self.schedule.set(t, cl, course);

        repair(problem, &mut self.schedule);
        self.fitness = fitness(evaluator, &self.schedule);
    }

    /// Cached fitness (non-negative).
    #[inline]
    pub fn fitness(&self) -> i64 {
        self.fitness
    }

    /// The decoded schedule.
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.schedule
    }

    /// Consumes the chromosome, yielding its schedule.
    pub fn into_solution(self) -> Solution {
        self.schedule
    }

    fn from_schedule(mut schedule: Solution, evaluator: &Evaluator<'_>) -> Self {
        repair(evaluator.problem(), &mut schedule);
        let fitness = fitness(evaluator, &schedule);
        Self { schedule, fitness }
    }
}

/// Selection fitness of a repaired schedule.
///
/// `150·Σ lectures − 50·Σ_c |required_c − scheduled_c| − 2·(enrolled − taken)`,
/// clamped at zero: roulette-wheel selection needs non-negative weights.
pub fn fitness(evaluator: &Evaluator<'_>, schedule: &Solution) -> i64 {
    let problem = evaluator.problem();
    let scheduled = evaluator.lecture_counts(schedule);
    let deviation: i64 = problem
        .lectures_per_course()
        .iter()
        .zip(&scheduled)
        .map(|(&required, &actual)| (required as i64 - actual as i64).abs())
        .sum();
    let overlap_penalty =
        evaluator.total_enrolled_lectures() as i64 - evaluator.taken_lectures(schedule) as i64;

    let value = 150 * evaluator.total_lectures() as i64 - 50 * deviation - 2 * overlap_penalty;
    value.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> Problem {
        Problem::new(
            3,
            2,
            2,
            2,
            vec![vec![1, 2], vec![2, 3], vec![3]],
            vec![2, 3, 2],
        )
    }

    #[test]
    fn test_genes_per_course_widths() {
        assert_eq!(genes_per_course(1), 1);
        assert_eq!(genes_per_course(2), 2);
        assert_eq!(genes_per_course(3), 2);
        assert_eq!(genes_per_course(4), 3);
        assert_eq!(genes_per_course(6), 3);
        assert_eq!(genes_per_course(7), 3);
        assert_eq!(genes_per_course(8), 4);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let p = sample_problem();
        let s = Solution::from_matrix(vec![
            vec![1, 2],
            vec![3, 0],
            vec![2, 1],
            vec![0, 3],
        ]);
        let genome = encode(&p, &s);
        assert_eq!(
            genome.len(),
            p.timeslots_count() * p.classroom_count() * genes_per_course(p.course_count())
        );
        assert_eq!(decode(&p, &genome), s);
    }

    #[test]
    fn test_repair_zeroes_out_of_range_ids() {
        let p = sample_problem();
        let mut s = Solution::from_matrix(vec![
            vec![1, 7],
            vec![3, 0],
            vec![2, 1],
            vec![0, 3],
        ]);
        repair(&p, &mut s);
        assert_eq!(s.get(0, 1), 0);
        assert_eq!(s.get(0, 0), 1);
    }

    #[test]
    fn test_repair_keeps_first_occurrence_in_slot() {
        let p = sample_problem();
        let mut s = Solution::from_matrix(vec![
            vec![2, 2],
            vec![3, 3],
            vec![1, 2],
            vec![0, 0],
        ]);
        repair(&p, &mut s);
        assert_eq!(s.timeslot(0), &[2, 0]);
        assert_eq!(s.timeslot(1), &[3, 0]);
        assert_eq!(s.timeslot(2), &[1, 2]);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let p = sample_problem();
        let mut s = Solution::from_matrix(vec![
            vec![2, 2],
            vec![5, 1],
            vec![1, 2],
            vec![3, 3],
        ]);
        repair(&p, &mut s);
        let once = s.clone();
        repair(&p, &mut s);
        assert_eq!(s, once);
    }

    #[test]
    fn test_random_chromosome_is_repaired_and_bounded() {
        let p = sample_problem();
        let e = Evaluator::new(&p).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..10 {
            let c = Chromosome::random(&e, &mut rng);
            assert!(e.check_feasible_lectures(c.solution()));
            for course in 1..=p.course_count() {
                assert!(
                    e.scheduled_lectures(course, c.solution())
                        <= p.lectures_per_course()[course - 1]
                );
            }
            assert!(c.fitness() >= 0);
        }
    }

    #[test]
    fn test_offspring_inherits_whole_slots() {
        let p = sample_problem();
        let e = Evaluator::new(&p).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let x = Chromosome::random(&e, &mut rng);
        let y = Chromosome::random(&e, &mut rng);

        for _ in 0..20 {
            let child = Chromosome::offspring(&x, &y, &e, &mut rng);
            // Both parents are slot-feasible, and repair only touches
            // lecture counts across slots, so each child row must match
            // the same row of one parent.
            for t in 0..p.timeslots_count() {
                let row = child.solution().timeslot(t);
                assert!(
                    row == x.solution().timeslot(t) || row == y.solution().timeslot(t)
                );
            }
            assert!(e.check_feasible_lectures(child.solution()));
        }
    }

    #[test]
    fn test_mutation_keeps_chromosome_valid() {
        let p = sample_problem();
        let e = Evaluator::new(&p).unwrap();
        let mut rng = SmallRng::seed_from_u64(13);
        let mut c = Chromosome::random(&e, &mut rng);
        for _ in 0..50 {
            c.mutate(&e, &mut rng);
            assert!(e.check_feasible_lectures(c.solution()));
            assert!(c
                .solution()
                .timeslots()
                .all(|row| row.iter().all(|&id| id <= p.course_count())));
            assert!(c.fitness() >= 0);
        }
    }

    #[test]
    fn test_fitness_rewards_exact_spread_schedules() {
        let p = Problem::new(2, 1, 2, 1, vec![vec![1, 2]], vec![1, 1]);
        let e = Evaluator::new(&p).unwrap();

        // Exact counts, both lectures attendable.
        let perfect = Solution::from_matrix(vec![vec![1], vec![2]]);
        // Course 2 missing entirely.
        let partial = Solution::from_matrix(vec![vec![1], vec![0]]);

        // 150*2 - 0 - 2*(2-2) = 300
        assert_eq!(fitness(&e, &perfect), 300);
        // 150*2 - 50*1 - 2*(2-1) = 248
        assert_eq!(fitness(&e, &partial), 248);
        assert!(fitness(&e, &perfect) > fitness(&e, &partial));
    }

    #[test]
    fn test_fitness_is_clamped_at_zero() {
        // One single-lecture course with 100 enrolled students, nothing
        // scheduled: 150*1 - 50*1 - 2*100 = -100 without the clamp.
        let p = Problem::new(1, 1, 2, 1, vec![vec![1]; 100], vec![1]);
        let e = Evaluator::new(&p).unwrap();
        let empty = Solution::new(p.timeslots_count(), p.classroom_count());
        assert_eq!(fitness(&e, &empty), 0);
    }
}
