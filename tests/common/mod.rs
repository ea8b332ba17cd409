//! Fixture types shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use yamlify::convert::iso_date;
use yamlify::{Binding, Error, Field, Yamlify};

#[derive(Debug, PartialEq)]
pub struct Grade {
    pub subject: String,
    pub classification: i32,
}

impl Yamlify for Grade {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Grade")
            .field(Field::<String>::new("subject"))
            .field(Field::<i32>::new("classification"))
            .construct(|args| {
                Ok(Grade {
                    subject: args.take()?,
                    classification: args.take()?,
                })
            })
    }
}

#[derive(Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub nr: u32,
    pub city: String,
}

impl Yamlify for Address {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Address")
            .field(Field::<String>::new("street"))
            .field(Field::<u32>::new("nr"))
            .field(Field::<String>::new("city"))
            .construct(|args| {
                Ok(Address {
                    street: args.take()?,
                    nr: args.take()?,
                    city: args.take()?,
                })
            })
    }
}

#[derive(Debug, PartialEq)]
pub struct Student {
    pub name: String,
    pub nr: u32,
    pub from: String,
    pub address: Option<Address>,
    pub grades: Vec<Grade>,
    pub birth: Option<NaiveDate>,
}

impl Yamlify for Student {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Student")
            .field(Field::<String>::new("name"))
            .field(Field::<u32>::new("nr"))
            .field(Field::<String>::new("from").alias("origin"))
            .field(Field::<Option<Address>>::new("address").optional())
            .field(Field::<Vec<Grade>>::new("grades").optional())
            .field(Field::converted("birth", |text| iso_date(text).map(Some)).optional())
            .construct(|args| {
                Ok(Student {
                    name: args.take()?,
                    nr: args.take()?,
                    from: args.take()?,
                    address: args.take()?,
                    grades: args.take()?,
                    birth: args.take()?,
                })
            })
    }
}

#[derive(Debug, PartialEq)]
pub struct City {
    pub name: String,
    pub country: String,
}

impl Yamlify for City {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("City")
            .field(Field::<String>::new("name"))
            .field(Field::<String>::new("country"))
            .construct(|args| {
                Ok(City {
                    name: args.take()?,
                    country: args.take()?,
                })
            })
    }
}

#[derive(Debug, PartialEq)]
pub struct NewAddress {
    pub street: String,
    pub nr: u32,
    pub city: City,
}

impl Yamlify for NewAddress {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("NewAddress")
            .field(Field::<String>::new("street"))
            .field(Field::<u32>::new("nr"))
            .field(Field::<City>::new("city"))
            .construct(|args| {
                Ok(NewAddress {
                    street: args.take()?,
                    nr: args.take()?,
                    city: args.take()?,
                })
            })
    }
}

pub fn enrollment_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).unwrap_or_default()
}

#[derive(Debug, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub nr: u32,
    pub from: String,
    pub birth: NaiveDate,
    pub address: Option<NewAddress>,
    pub grades: Vec<Grade>,
}

impl Yamlify for NewStudent {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("NewStudent")
            .field(Field::<String>::new("name"))
            .field(Field::<u32>::new("nr"))
            .field(Field::<String>::new("from").alias("origin"))
            .field(Field::converted("birth", iso_date).default_with(enrollment_day))
            .field(Field::<Option<NewAddress>>::new("address").optional())
            .field(Field::<Vec<Grade>>::new("grades").optional())
            .construct(|args| {
                Ok(NewStudent {
                    name: args.take()?,
                    nr: args.take()?,
                    from: args.take()?,
                    birth: args.take()?,
                    address: args.take()?,
                    grades: args.take()?,
                })
            })
    }
}

#[derive(Debug, PartialEq)]
pub struct Classroom {
    pub id: String,
    pub students: Vec<Student>,
}

impl Yamlify for Classroom {
    fn binding() -> Result<Binding<Self>, Error> {
        Binding::record("Classroom")
            .field(Field::<String>::new("id"))
            .field(Field::<Vec<Student>>::new("students"))
            .construct(|args| {
                Ok(Classroom {
                    id: args.take()?,
                    students: args.take()?,
                })
            })
    }
}

/// Two students, each with an address and a block of grades.
pub const STUDENTS: &str = "\
-
  name: Maria Candida
  nr: 873435
  address:
    street: Rua Rosa
    nr: 78
    city: Lisbon
  from: Oleiros
  grades:
    -
      subject: LAE
      classification: 18
    -
      subject: PDM
      classification: 15
    -
      subject: PC
      classification: 19
-
  name: Jose Carioca
  nr: 1214398
  address:
    street: Rua Azul
    nr: 12
    city: Porto
  from: Tamega
  grades:
    -
      subject: TDS
      classification: 20
    -
      subject: LAE
      classification: 18
";

pub fn grade(subject: &str, classification: i32) -> Grade {
    Grade {
        subject: subject.to_owned(),
        classification,
    }
}

pub fn assert_students(students: &[Student]) {
    assert_eq!(students.len(), 2);

    let maria = &students[0];
    assert_eq!(maria.name, "Maria Candida");
    assert_eq!(maria.nr, 873435);
    assert_eq!(maria.from, "Oleiros");
    assert_eq!(
        maria.address,
        Some(Address {
            street: "Rua Rosa".into(),
            nr: 78,
            city: "Lisbon".into(),
        })
    );
    assert_eq!(
        maria.grades,
        vec![grade("LAE", 18), grade("PDM", 15), grade("PC", 19)]
    );

    let jose = &students[1];
    assert_eq!(jose.name, "Jose Carioca");
    assert_eq!(jose.nr, 1214398);
    assert_eq!(jose.from, "Tamega");
    assert_eq!(jose.address.as_ref().map(|a| a.city.as_str()), Some("Porto"));
    assert_eq!(jose.grades, vec![grade("TDS", 20), grade("LAE", 18)]);
}
