mod concurrency;
mod limits;
