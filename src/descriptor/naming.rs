//! Deterministic names of the generated modules and resources

/// Name generator for one project prefix (the lower-cased descriptor `ID`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    project: String,
}

impl Names {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project: project_name.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn approuter(&self) -> String {
        format!("{}-approuter", self.project)
    }

    pub fn destination_content(&self) -> String {
        format!("{}-destination-content", self.project)
    }

    pub fn ui_deployer(&self) -> String {
        format!("{}_ui_deployer", self.project)
    }

    pub fn html_repo_host(&self) -> String {
        format!("{}_html_repo_host", self.project)
    }

    pub fn html_repo_runtime(&self) -> String {
        format!("{}_html_repo_runtime", self.project)
    }

    pub fn uaa(&self) -> String {
        format!("{}_uaa", self.project)
    }

    pub fn portal_resources(&self) -> String {
        format!("portal_resources_{}", self.project)
    }

    pub fn destination(&self) -> String {
        format!("{}-destination", self.project)
    }

    pub fn html_repo_host_instance(&self) -> String {
        format!("{}-html5-app-host-service", self.project)
    }

    pub fn xsuaa_instance(&self) -> String {
        format!("{}-xsuaa-service", self.project)
    }

    pub fn destination_instance(&self) -> String {
        format!("{}-destination-service", self.project)
    }

    pub fn uaa_key(&self) -> String {
        format!("{}-key", self.uaa())
    }

    pub fn html_repo_host_key(&self) -> String {
        format!("{}-key", self.html_repo_host())
    }
}

/// Business solution name with dots as underscores, used inside destination names
pub fn solution_instance_name(business_solution: &str) -> String {
    business_solution.replace('.', "_")
}

/// `sap.cloud.service` label: the instance form with underscores as dots
pub fn solution_label(business_solution: &str) -> String {
    solution_instance_name(business_solution).replace('_', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let names = Names::new("test-project");
        assert_eq!(names.approuter(), "test-project-approuter");
        assert_eq!(names.ui_deployer(), "test-project_ui_deployer");
        assert_eq!(names.portal_resources(), "portal_resources_test-project");
        assert_eq!(names.uaa_key(), "test-project_uaa-key");
    }

    #[test]
    fn test_solution_names() {
        assert_eq!(solution_instance_name("test.solution"), "test_solution");
        assert_eq!(solution_label("test.solution"), "test.solution");
        assert_eq!(solution_label("my_solution"), "my.solution");
    }
}
