/// Test Plan - setup/teardown pairing
///
/// Problems may vary only the setup or only the teardown code across test
/// cases. The plan pairs them up once at load time so each test case maps to
/// exactly one `Wrapper`.
///
/// **Padding Rule:**
/// The shorter sequence is padded by repeating its *first* element until both
/// have equal length. It never cycles through the other elements.
use crate::types::ProblemSpec;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("setup code has {setup} entries but teardown code has {teardown}; one side is empty")]
    Unpaired { setup: usize, teardown: usize },

    #[error("{wrappers} setup/teardown pairs cannot cover {tests} test cases")]
    MissingWrapper { wrappers: usize, tests: usize },
}

/// Code placed around the candidate's code for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrapper {
    pub setup: String,
    pub teardown: String,
}

impl Wrapper {
    /// Full script text: setup, then candidate code, then teardown
    pub fn compose(&self, code: &str) -> String {
        let mut script = String::with_capacity(self.setup.len() + code.len() + self.teardown.len());
        script.push_str(&self.setup);
        script.push_str(code);
        script.push_str(&self.teardown);
        script
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    wrappers: Vec<Wrapper>,
    test_count: usize,
}

impl TestPlan {
    /// Build the plan for a decoded problem
    pub fn build(spec: &ProblemSpec) -> Result<Self, PlanError> {
        let (setup, teardown) = pad_to_equal(&spec.setup_code, &spec.teardown_code)?;

        let wrappers: Vec<Wrapper> = if setup.is_empty() {
            vec![Wrapper::default()]
        } else {
            setup
                .into_iter()
                .zip(teardown)
                .map(|(setup, teardown)| Wrapper { setup, teardown })
                .collect()
        };

        let test_count = spec.test_count();
        if wrappers.len() > 1 && wrappers.len() < test_count {
            return Err(PlanError::MissingWrapper {
                wrappers: wrappers.len(),
                tests: test_count,
            });
        }

        Ok(Self { wrappers, test_count })
    }

    /// Wrapper used for test case `index`
    pub fn wrapper_for(&self, index: usize) -> &Wrapper {
        if self.rewrites_per_test() {
            &self.wrappers[index]
        } else {
            &self.wrappers[0]
        }
    }

    /// True when the script differs between test cases and must be rewritten
    pub fn rewrites_per_test(&self) -> bool {
        self.wrappers.len() > 1
    }

    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }
}

/// Pad the shorter sequence with copies of its first element
///
/// Two empty sequences stay empty. Exactly one empty sequence has no first
/// element to repeat and is rejected.
pub fn pad_to_equal(setup: &[String], teardown: &[String]) -> Result<(Vec<String>, Vec<String>), PlanError> {
    if setup.is_empty() != teardown.is_empty() {
        return Err(PlanError::Unpaired {
            setup: setup.len(),
            teardown: teardown.len(),
        });
    }

    let mut setup = setup.to_vec();
    let mut teardown = teardown.to_vec();

    while setup.len() < teardown.len() {
        setup.push(setup[0].clone());
    }
    while teardown.len() < setup.len() {
        teardown.push(teardown[0].clone());
    }

    Ok((setup, teardown))
}
