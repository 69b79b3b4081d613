//! Aggregated probe results.

use crate::probe::runner::ProbeOutcome;

#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    outcomes: Vec<ProbeOutcome>,
}

impl ProbeReport {
    pub fn record(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn run(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.verdict.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.run() - self.passed()
    }

    /// Percentage of passing probes; 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.passed() as f64 / self.run() as f64 * 100.0
    }

    pub fn failures(&self) -> Vec<String> {
        self.outcomes.iter().filter_map(ProbeOutcome::failure_message).collect()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code: 0 when every probe passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// Summary block printed after the run.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "=".repeat(50)));
        out.push_str("📊 Test Results:\n");
        out.push_str(&format!("   Tests Run: {}\n", self.run()));
        out.push_str(&format!("   Tests Passed: {}\n", self.passed()));
        out.push_str(&format!("   Tests Failed: {}\n", self.failed()));
        out.push_str(&format!("   Success Rate: {:.1}%\n", self.success_rate()));

        let failures = self.failures();
        if failures.is_empty() {
            out.push_str("\n✅ All tests passed!\n");
        } else {
            out.push_str("\n❌ Failed Tests:\n");
            for failure in failures {
                out.push_str(&format!("   • {}\n", failure));
            }
        }
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }
}
