// single test binary: linking is sequential, so bundling every case into one
// executable keeps the suite fast. one file per behavior group; shared setup
// lives in helpers.
mod helpers;
