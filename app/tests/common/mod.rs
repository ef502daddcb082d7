//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use dashboard_lib::{DashboardConfig, RequestContext};
use records::{FieldValue, Record};
use store::{DocumentStore, InMemoryObjectStore, InMemoryStore, ObjectStore, TableSchema};

pub const ADMIN: &str = "admin1";
pub const FACGOV_MEMBER: &str = "fg2222";
pub const SEARCHER: &str = "sc3333";
pub const DEPT_CHAIR: &str = "dp4444";
pub const LAB_USER: &str = "lb5555";
pub const STRANGER: &str = "zz9999";

/// Test harness holding a configured in-memory deployment.
pub struct TestHarness {
    pub config: DashboardConfig,
    pub store: InMemoryStore,
    pub objects: InMemoryObjectStore,
}

/// Environment variables of the PROD deployment used by every test.
pub fn table_vars() -> HashMap<String, String> {
    [
        ("DB_USERS_PROD", "users"),
        ("DB_ACCESS_LOGS_PROD", "access_logs"),
        ("DB_SEARCHCOM_APPLICANT_PROD", "searchcom_applicant"),
        ("DB_SEARCHCOM_POSTING_PROD", "searchcom_posting"),
        ("DB_SEARCHCOM_PIPELINE_PROD", "searchcom_pipeline"),
        ("DB_SEARCHCOM_SUBFIELDS_PROD", "searchcom_subfields"),
        ("DB_LAB_OCCUPANCY_PROD", "lab_occupancy"),
        ("DB_DEPTPROFILE_PROD", "deptprofile"),
        ("DB_REPOSITORY_PROD", "repository"),
        ("DB_FACGOV_PROD", "facgov"),
        ("REPOSITORY_BUCKET_NAME_PROD", "repository-bucket"),
        ("FACGOV_BUCKET_NAME_PROD", "facgov-bucket"),
        ("FORM_URL", "https://forms.example.edu/lab"),
        ("DASHBOARD_FIRST_FISCAL_YEAR", "2005"),
        ("DASHBOARD_LAST_FISCAL_YEAR", "2012"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn file(unit: &str, year: &str, name: &str) -> Record {
    Record::new()
        .with("key", format!("{}/{}", unit, name))
        .with("unit", unit)
        .with("year", year)
        .with("file_name", name)
}

fn list(values: &[&str]) -> FieldValue {
    FieldValue::List(values.iter().map(|v| FieldValue::from(*v)).collect())
}

impl TestHarness {
    /// Empty tables with their schemas.
    pub fn new() -> Self {
        let vars = table_vars();
        let config = DashboardConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        let store = InMemoryStore::new();

        let tables = &config.tables;
        let file_schema = || TableSchema::new("key", None).with_index("unit-year-index", "unit", Some("year"));
        store.create_table(&tables.users, TableSchema::new("uni", None)).unwrap();
        store
            .create_table(&tables.access_logs, TableSchema::new("uni", Some("entry_id")))
            .unwrap();
        store.create_table(&tables.repository, file_schema()).unwrap();
        store.create_table(&tables.facgov, file_schema()).unwrap();
        store
            .create_table(&tables.deptprofile, TableSchema::new("PK", Some("SK")))
            .unwrap();
        store
            .create_table(&tables.searchcom_posting, TableSchema::new("req_num", None))
            .unwrap();
        store
            .create_table(&tables.searchcom_applicant, TableSchema::new("req_num", None))
            .unwrap();
        store
            .create_table(&tables.searchcom_pipeline, TableSchema::new("Dept", None))
            .unwrap();
        store
            .create_table(&tables.searchcom_subfields, TableSchema::new("Dept", None))
            .unwrap();
        store
            .create_table(&tables.lab_occupancy, TableSchema::new("uni", Some("timestamp")))
            .unwrap();

        TestHarness {
            config,
            store,
            objects: InMemoryObjectStore::new(),
        }
    }

    /// Every table seeded with a small, realistic dataset.
    pub fn with_sample_data() -> Self {
        let harness = Self::new();
        harness.populate_users();
        harness.populate_files();
        harness.populate_deptprofile();
        harness.populate_searchcom();
        harness
    }

    pub fn ctx(&self, uni: &str) -> RequestContext<'_> {
        RequestContext::for_uni(&self.config, &self.store, &self.objects, uni).unwrap()
    }

    pub fn put(&self, table: &str, item: Record) {
        self.store.put_item(table, item).unwrap();
    }

    pub fn access_logs_for(&self, uni: &str) -> Vec<Record> {
        self.store
            .query(&self.config.tables.access_logs, &store::Query::partition(uni))
            .unwrap()
    }

    fn populate_users(&self) {
        let users = &self.config.tables.users;
        self.put(users, Record::new().with("uni", ADMIN).with("roles", list(&["admin"])));
        self.put(users, Record::new().with("uni", FACGOV_MEMBER).with("roles", list(&["facgov"])));
        self.put(
            users,
            Record::new()
                .with("uni", SEARCHER)
                .with("roles", list(&["searchcom"]))
                .with("requisitions", list(&["R100", "R300"])),
        );
        self.put(
            users,
            Record::new()
                .with("uni", DEPT_CHAIR)
                .with("roles", list(&["deptprofile"]))
                .with("departments", list(&["ECON"])),
        );
        self.put(users, Record::new().with("uni", LAB_USER).with("roles", list(&["lab_occupancy"])));
    }

    fn populate_files(&self) {
        let repository = &self.config.tables.repository;
        for item in [
            file("PPC", "2020", "Budget.pdf"),
            file("PPC", "2019", "Agenda.pdf"),
            file("PPC", "2020", "Appointments.pdf"),
            file("EPPC", "2020", "Curriculum.docx"),
            file("CED", "2018", "Report.pdf"),
        ] {
            self.put(repository, item);
        }

        let facgov = &self.config.tables.facgov;
        for item in [
            file("faculty_meeting", "2020", "Faculty Meeting Minutes 2019-10-17"),
            file("faculty_meeting", "2020", "Faculty Meeting Agenda 2019-10-17"),
            file("faculty_meeting", "2020", "Faculty Meeting Agenda 2020-02-06"),
            file("faculty_meeting", "2019", "Faculty Meeting Agenda 2019-03-14"),
            file("faculty_meeting", "2020", "Meeting schedule.pdf"),
            file("PPC", "2020", "Charter.pdf"),
            file("PPC", "2019", "Annual Report.pdf"),
        ] {
            self.put(facgov, item);
        }

        self.objects
            .put("repository-bucket", "PPC/Budget.pdf", b"%PDF budget".to_vec())
            .unwrap();
        self.objects
            .put("facgov-bucket", "PPC/Charter.pdf", b"%PDF charter".to_vec())
            .unwrap();
    }

    fn populate_deptprofile(&self) {
        let table = &self.config.tables.deptprofile;
        for (year, maj, min) in [(2006, 40.0, 12.0), (2007, 44.0, 9.0), (2010, 51.0, 15.0)] {
            self.put(
                table,
                Record::new()
                    .with("PK", "DEPT#ECON")
                    .with("SK", format!("DATA#STUDENTS#UG#{}", year))
                    .with("maj", maj)
                    .with("conc", 3.0)
                    .with("intdmaj", 1.0)
                    .with("min", min),
            );
        }
        for (year, cohort, existing, selectivity, yld) in [
            (2010, 20.0, 55.0, 0.31, 0.42),
            (2011, 22.0, 60.0, 0.29, 0.4),
            (2012, 25.0, 61.0, 0.341, 0.38),
        ] {
            self.put(
                table,
                Record::new()
                    .with("PK", "DEPT#ECON")
                    .with("SK", format!("DATA#STUDENTS#PHD#{}", year))
                    .with("cohort", cohort)
                    .with("existing", existing)
                    .with("selectivity", selectivity)
                    .with("yield", yld),
            );
        }
        for (year, ten_stat, count) in [
            (2009, "Tenured", 1250.0),
            (2009, "Lecturer", 3.0),
            (2011, "Tenured", 1302.4),
        ] {
            self.put(
                table,
                Record::new()
                    .with("PK", "DEPT#ECON")
                    .with("SK", format!("DATA#AGG#CLASSES#{}#{}", year, ten_stat))
                    .with("ten_stat", ten_stat)
                    .with("count", count),
            );
        }
        for (year, ten_stat, fte, female, urm) in [
            (2010, "Tenured", 20.0, Some(0.25), Some(0.1)),
            (2010, "NTBOT", 5.0, Some(0.4), Some(0.2)),
            (2010, "Lecturers", 3.0, Some(0.9), Some(0.9)),
            (2011, "Tenured", 22.0, Some(0.27), None),
            (2011, "NTBOT", 6.0, Some(0.5), Some(0.3)),
        ] {
            let mut row = Record::new()
                .with("PK", "DEPT#ECON")
                .with("SK", format!("DATA#FACULTY_DATA#{}#{}", year, ten_stat))
                .with("ten_stat", ten_stat)
                .with("fte", fte);
            if let Some(female) = female {
                row.insert("percent_fem", female);
            }
            if let Some(urm) = urm {
                row.insert("percent_urm", urm);
            }
            self.put(table, row);
        }
        for (course_type, ten_stat, count) in [
            ("Core", "Tenured", 40.0),
            ("Elective", "Tenured", 90.0),
            ("Core", "Lecturer", 2.0),
        ] {
            self.put(
                table,
                Record::new()
                    .with("PK", "DEPT#ECON")
                    .with("SK", format!("DATA#CLASSES#2011#{}#{}", course_type, ten_stat))
                    .with("course_type", course_type)
                    .with("ten_stat", ten_stat)
                    .with("count", count),
            );
        }
        for (year, uni, name) in [
            (2012, "al100", "Ada Lovelace"),
            (2012, "ct200", "Charles Tilly"),
            (2011, "jm300", "John Maynard"),
        ] {
            self.put(
                table,
                Record::new()
                    .with("PK", "DEPT#ECON")
                    .with("SK", format!("DATA#FACULTY_LIST#{}#{}", year, uni))
                    .with("name", name)
                    .with("title", "Professor"),
            );
        }
        self.put(
            table,
            Record::new()
                .with("PK", "DEPT#HIST")
                .with("SK", "DATA#STUDENTS#UG#2008")
                .with("maj", 30.0),
        );
    }

    fn populate_searchcom(&self) {
        let tables = &self.config.tables;
        for (req, dept_code, dept_name, year) in [
            ("R100", "ECON", "Economics", "2019/20"),
            ("R200", "HIST", "History", "2019/20"),
            ("R300", "ECON", "Economics", "2020/21"),
        ] {
            self.put(
                &tables.searchcom_posting,
                Record::new()
                    .with("req_num", req)
                    .with("dept_code", dept_code)
                    .with("dept_name", dept_name)
                    .with("position_title", "Assistant Professor")
                    .with("open_date", "2019-09-01")
                    .with("start_date", "2020-07-01")
                    .with("field", "Macroeconomics")
                    .with("academic_year", year),
            );
        }

        let mut xtab = std::collections::BTreeMap::new();
        let mut female = std::collections::BTreeMap::new();
        let mut white = std::collections::BTreeMap::new();
        white.insert("No".to_string(), FieldValue::Number(6.0));
        white.insert("Yes".to_string(), FieldValue::Number(0.0));
        female.insert("White".to_string(), FieldValue::Map(white));
        xtab.insert("Female".to_string(), FieldValue::Map(female));

        let aggregate = |count: f64, women: f64, men: f64| {
            let mut agg = std::collections::BTreeMap::new();
            for (k, v) in [
                ("person_id_count", count),
                ("gender_Female_sum", women),
                ("gender_Male_sum", men),
                ("gender_Female_pcnt", 38.0),
                ("ethnicity_URM_sum", 3.0),
                ("ethnicity_URM_pcnt", 12.0),
                ("ethnicity_Asian_sum", 6.0),
                ("ethnicity_Asian_pcnt", 23.0),
                ("ethnicity_White_sum", 11.0),
                ("ethnicity_White_pcnt", 42.0),
            ] {
                agg.insert(k.to_string(), FieldValue::Number(v));
            }
            FieldValue::Map(agg)
        };

        self.put(
            &tables.searchcom_applicant,
            Record::new()
                .with("req_num", "R100")
                .with("refresh_date", "2020-01-15")
                .with("agg", aggregate(26.0, 10.0, 16.0))
                .with("xtab", FieldValue::Map(xtab.clone())),
        );
        self.put(
            &tables.searchcom_applicant,
            Record::new()
                .with("req_num", "R300")
                .with("refresh_date", "2020-01-15")
                .with("agg", aggregate(2.0, 1.0, 1.0))
                .with("xtab", FieldValue::Map(xtab)),
        );

        let mut pipeline = Record::new().with("Dept", "ECON");
        for prefix in [
            "combined_1993-2012",
            "tenured_1993-2007",
            "untenured_2008-2012",
            "untenured_2013-2016",
        ] {
            for (suffix, value) in [("women", 33.0), ("urm", 8.0), ("asian", 17.0), ("white", 70.0)] {
                pipeline.insert(format!("{}_{}", prefix, suffix), value);
            }
        }
        self.put(&tables.searchcom_pipeline, pipeline);
        self.put(
            &tables.searchcom_subfields,
            Record::new()
                .with("Dept", "ECON")
                .with("Subfield", "Economics, Econometrics"),
        );
    }
}
